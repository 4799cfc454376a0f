use crate::error::AppError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    #[error("no successful clips to combine")]
    EmptyInput,
    #[error("failed to decode clip {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("clip {path} has format {found}, expected {expected}")]
    FormatMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("clips {first} and {second} share index {index}")]
    DuplicateIndex {
        index: usize,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("failed to read {path}: {reason}")]
    IoRead { path: PathBuf, reason: String },
    #[error("failed to write {path}: {reason}")]
    IoWrite { path: PathBuf, reason: String },
}

impl From<CombineError> for AppError {
    fn from(err: CombineError) -> Self {
        match err {
            CombineError::EmptyInput => AppError::EmptyInput(err.to_string()),
            CombineError::IoRead { .. } | CombineError::IoWrite { .. } => {
                AppError::Io(err.to_string())
            }
            CombineError::Decode { .. }
            | CombineError::FormatMismatch { .. }
            | CombineError::DuplicateIndex { .. } => AppError::Validation(err.to_string()),
        }
    }
}
