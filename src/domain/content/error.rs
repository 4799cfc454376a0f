use crate::error::AppError;

/// Failure of the external content service (outline or transcript)
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Dependency(msg) => AppError::ExternalService(msg),
            GenerationError::Malformed(msg) => AppError::Generation(msg),
            GenerationError::Other(e) => AppError::Generation(e.to_string()),
        }
    }
}
