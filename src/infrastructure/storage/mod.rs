//! On-disk layout of a run and atomic artifact writes.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("slug pattern"));
static CLIP_FILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^clip_(\d+)(?:_.*)?\.wav$").expect("clip file pattern"));

pub const OUTLINE_FILE: &str = "outline.json";
pub const TRANSCRIPT_FILE: &str = "transcript.json";
pub const CLIP_MANIFEST_FILE: &str = "clips.json";
pub const COMBINED_FILE: &str = "podcast.wav";
pub const CLIPS_DIR: &str = "clips";

/// File name for the clip of a given line, e.g. `clip_007_sarah.wav`
pub fn clip_file_name(dialogue_index: usize, speaker: &str) -> String {
    let slug = UNSAFE_CHARS.replace_all(speaker.trim(), "_");
    let slug = slug.trim_matches('_').to_lowercase();
    if slug.is_empty() {
        format!("clip_{:03}.wav", dialogue_index)
    } else {
        format!("clip_{:03}_{}.wav", dialogue_index, slug)
    }
}

/// Ordering key encoded in a clip file name, if it is one
pub fn parse_clip_index(file_name: &str) -> Option<usize> {
    CLIP_FILE_PATTERN
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Paths of every artifact a run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunLayout {
    pub run_id: Uuid,
    pub dir: PathBuf,
    pub outline_path: PathBuf,
    pub transcript_path: PathBuf,
    pub clips_dir: PathBuf,
    pub clip_manifest_path: PathBuf,
    pub combined_path: PathBuf,
}

impl RunLayout {
    pub fn in_dir(run_id: Uuid, dir: PathBuf) -> Self {
        Self {
            run_id,
            outline_path: dir.join(OUTLINE_FILE),
            transcript_path: dir.join(TRANSCRIPT_FILE),
            clips_dir: dir.join(CLIPS_DIR),
            clip_manifest_path: dir.join(CLIP_MANIFEST_FILE),
            combined_path: dir.join(COMBINED_FILE),
            dir,
        }
    }
}

/// Creates run directories under a root output directory
#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
}

impl RunStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create `<root>/<timestamp>_<id prefix>/clips`
    pub async fn prepare(
        &self,
        run_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> std::io::Result<RunLayout> {
        let short_id: String = run_id.simple().to_string().chars().take(8).collect();
        let dir_name = format!("{}_{}", started_at.format("%Y%m%dT%H%M%SZ"), short_id);
        let layout = RunLayout::in_dir(run_id, self.root.join(dir_name));

        tokio::fs::create_dir_all(&layout.clips_dir).await?;
        tracing::debug!(run_id = %run_id, dir = %layout.dir.display(), "Run directory prepared");

        Ok(layout)
    }
}

/// Write bytes to `path` through a sibling temp file and rename
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    let tmp_path = path.with_file_name(format!(".{}.{}.part", file_name, Uuid::new_v4().simple()));

    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e);
    }
    Ok(())
}

/// Pretty-printed JSON artifact, written atomically
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> std::io::Result<()> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    write_atomic(path, &bytes).await
}
