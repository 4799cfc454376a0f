use crate::domain::audio::CombineError;
use crate::domain::content::GenerationError;
use crate::domain::speaker::SpeakerError;
use crate::error::AppError;
use std::path::{Path, PathBuf};

/// Run-level failure taxonomy
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("no successful clips to combine")]
    EmptyInput,
    #[error("failed to write {path}: {reason}")]
    IoWrite { path: PathBuf, reason: String },
    #[error("audio assembly failed: {0}")]
    Audio(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn io_write(path: &Path, err: impl std::fmt::Display) -> Self {
        PipelineError::IoWrite {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

impl From<SpeakerError> for PipelineError {
    fn from(err: SpeakerError) -> Self {
        PipelineError::Validation(err.to_string())
    }
}

impl From<CombineError> for PipelineError {
    fn from(err: CombineError) -> Self {
        match err {
            CombineError::EmptyInput => PipelineError::EmptyInput,
            CombineError::IoWrite { path, reason } => PipelineError::IoWrite { path, reason },
            other => PipelineError::Audio(other.to_string()),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(msg) => AppError::Validation(msg),
            PipelineError::Generation(err) => err.into(),
            PipelineError::EmptyInput => AppError::EmptyInput("no successful clips".to_string()),
            PipelineError::IoWrite { path, reason } => {
                AppError::Io(format!("{}: {}", path.display(), reason))
            }
            PipelineError::Audio(msg) | PipelineError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
