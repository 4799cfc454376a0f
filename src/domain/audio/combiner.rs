//! Ordered concatenation of clip WAV files into one episode.

use super::error::CombineError;
use super::wav::describe_spec;
use crate::domain::synthesis::ClipSet;
use crate::infrastructure::storage::parse_clip_index;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use serde::Serialize;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

const DEFAULT_INTER_CLIP_SILENCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Silence inserted between consecutive clips, never before the first or after the last
    pub inter_clip_silence: Duration,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            inter_clip_silence: DEFAULT_INTER_CLIP_SILENCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedAudio {
    pub output_path: PathBuf,
    pub duration_secs: f64,
    pub source_clip_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AudioCombiner {
    options: CombineOptions,
}

impl AudioCombiner {
    pub fn new(options: CombineOptions) -> Self {
        Self { options }
    }

    /// Combine the successful clips of a batch in transcript order.
    ///
    /// Fails with `EmptyInput` before touching the output path when no clip succeeded.
    pub fn combine_clip_set(
        &self,
        clips: &ClipSet,
        output: &Path,
    ) -> Result<CombinedAudio, CombineError> {
        let mut ordered: Vec<(usize, PathBuf)> = clips
            .successful()
            .filter_map(|clip| clip.path.clone().map(|path| (clip.dialogue_index, path)))
            .collect();
        ordered.sort_by_key(|(index, _)| *index);

        let paths: Vec<PathBuf> = ordered.into_iter().map(|(_, path)| path).collect();
        self.combine_paths(&paths, output)
    }

    /// Combine every `clip_<index>[_speaker].wav` in `dir`, ordered by the numeric index.
    ///
    /// Other files in the directory are ignored. Two clips with the same index
    /// (e.g. a stale file left after a speaker rename) fail with `DuplicateIndex`.
    pub fn combine_directory(
        &self,
        dir: &Path,
        output: &Path,
    ) -> Result<CombinedAudio, CombineError> {
        let entries = std::fs::read_dir(dir).map_err(|e| CombineError::IoRead {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut indexed: Vec<(usize, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CombineError::IoRead {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
            let name = entry.file_name();
            if let Some(index) = parse_clip_index(&name.to_string_lossy()) {
                indexed.push((index, entry.path()));
            }
        }
        indexed.sort();

        if let Some(pair) = indexed.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(CombineError::DuplicateIndex {
                index: pair[0].0,
                first: pair[0].1.clone(),
                second: pair[1].1.clone(),
            });
        }

        tracing::debug!(dir = %dir.display(), clip_count = indexed.len(), "Clip directory scanned");

        let paths: Vec<PathBuf> = indexed.into_iter().map(|(_, path)| path).collect();
        self.combine_paths(&paths, output)
    }

    /// Concatenate `paths` in the given order into `output`
    pub fn combine_paths(
        &self,
        paths: &[PathBuf],
        output: &Path,
    ) -> Result<CombinedAudio, CombineError> {
        let Some(first) = paths.first() else {
            return Err(CombineError::EmptyInput);
        };

        let spec = open_clip(first)?.spec();
        let silence_frames =
            (spec.sample_rate as u128 * self.options.inter_clip_silence.as_millis() / 1000) as u64;

        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let write_err = |e: &dyn std::fmt::Display| CombineError::IoWrite {
            path: output.to_path_buf(),
            reason: e.to_string(),
        };

        std::fs::create_dir_all(&parent).map_err(|e| write_err(&e))?;
        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| write_err(&e))?;

        let mut total_frames: u64 = 0;
        {
            let mut writer =
                WavWriter::new(BufWriter::new(tmp.as_file_mut()), spec).map_err(|e| write_err(&e))?;

            for (position, path) in paths.iter().enumerate() {
                if position > 0 && silence_frames > 0 {
                    write_silence(&mut writer, spec, silence_frames).map_err(|e| write_err(&e))?;
                    total_frames += silence_frames;
                }

                let reader = open_clip(path)?;
                if reader.spec() != spec {
                    return Err(CombineError::FormatMismatch {
                        path: path.clone(),
                        expected: describe_spec(&spec),
                        found: describe_spec(&reader.spec()),
                    });
                }
                let frames = copy_samples(reader, &mut writer, path, output)?;
                total_frames += frames;
            }

            writer.finalize().map_err(|e| write_err(&e))?;
        }

        tmp.persist(output).map_err(|e| write_err(&e.error))?;

        let duration_secs = total_frames as f64 / spec.sample_rate as f64;
        tracing::info!(
            output = %output.display(),
            source_clip_count = paths.len(),
            duration_secs,
            "Combined audio written"
        );

        Ok(CombinedAudio {
            output_path: output.to_path_buf(),
            duration_secs,
            source_clip_count: paths.len(),
        })
    }
}

fn open_clip(path: &Path) -> Result<WavReader<std::io::BufReader<std::fs::File>>, CombineError> {
    WavReader::open(path).map_err(|e| CombineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_silence<W>(
    writer: &mut WavWriter<W>,
    spec: WavSpec,
    frames: u64,
) -> Result<(), hound::Error>
where
    W: std::io::Write + std::io::Seek,
{
    let samples = frames * spec.channels as u64;
    for _ in 0..samples {
        match spec.sample_format {
            SampleFormat::Int => writer.write_sample(0i32)?,
            SampleFormat::Float => writer.write_sample(0.0f32)?,
        }
    }
    Ok(())
}

/// Copy every sample from `reader`, returning the number of frames copied
fn copy_samples<R, W>(
    mut reader: WavReader<R>,
    writer: &mut WavWriter<W>,
    source: &Path,
    output: &Path,
) -> Result<u64, CombineError>
where
    R: std::io::Read,
    W: std::io::Write + std::io::Seek,
{
    let decode_err = |e: hound::Error| CombineError::Decode {
        path: source.to_path_buf(),
        reason: e.to_string(),
    };
    let write_err = |e: hound::Error| CombineError::IoWrite {
        path: output.to_path_buf(),
        reason: e.to_string(),
    };

    let spec = reader.spec();
    let mut samples: u64 = 0;
    match spec.sample_format {
        SampleFormat::Int => {
            for sample in reader.samples::<i32>() {
                writer.write_sample(sample.map_err(decode_err)?).map_err(write_err)?;
                samples += 1;
            }
        }
        SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                writer.write_sample(sample.map_err(decode_err)?).map_err(write_err)?;
                samples += 1;
            }
        }
    }

    Ok(samples / spec.channels.max(1) as u64)
}
