use super::error::PipelineError;
use crate::domain::audio::CombinedAudio;
use crate::domain::content::{ContentInput, Outline, Transcript};
use crate::domain::progress::{ProgressEvent, Stage};
use crate::domain::speaker::SpeakerProfile;
use crate::domain::synthesis::{ClipSet, QualityPreset, SynthesisParameters};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Inputs of a single run. Read-only once the run starts.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub content_input: ContentInput,
    pub speaker_profile: SpeakerProfile,
    pub synthesis_parameters: SynthesisParameters,
    pub quality_preset: QualityPreset,
}

/// Everything a successful run hands back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct RunArtifacts {
    pub run_id: Uuid,
    pub run_dir: PathBuf,
    pub outline_path: PathBuf,
    pub transcript_path: PathBuf,
    /// Successful clip files in transcript order
    pub clip_paths: Vec<PathBuf>,
    pub clip_manifest_path: PathBuf,
    pub combined_audio_path: PathBuf,
    pub combined: CombinedAudio,
    pub outline: Outline,
    pub transcript: Transcript,
    pub clips: ClipSet,
    pub history: Vec<ProgressEvent>,
}

/// Artifacts that were persisted before a fatal failure
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartialArtifacts {
    pub run_dir: Option<PathBuf>,
    pub outline_path: Option<PathBuf>,
    pub transcript_path: Option<PathBuf>,
    pub clip_paths: Vec<PathBuf>,
    pub clip_manifest_path: Option<PathBuf>,
}

impl PartialArtifacts {
    pub fn is_empty(&self) -> bool {
        self.outline_path.is_none()
            && self.transcript_path.is_none()
            && self.clip_paths.is_empty()
            && self.clip_manifest_path.is_none()
    }
}

/// A fatal run failure with the progress history up to that point
#[derive(Debug, thiserror::Error)]
#[error("{stage}: {error}", stage = .failed_stage.map(|s| s.as_str()).unwrap_or("run setup"))]
pub struct RunFailure {
    #[source]
    pub error: PipelineError,
    /// `None` when the request was rejected before any stage started
    pub failed_stage: Option<Stage>,
    pub partial: PartialArtifacts,
    pub history: Vec<ProgressEvent>,
}
