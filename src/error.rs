use serde::Serialize;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Content generation failed: {0}")]
    Generation(String),

    #[error("Nothing to combine: {0}")]
    EmptyInput(String),

    #[error("Failed to write artifact: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error report printed by the driver - message + exit code
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub message: String,
    pub exit_code: u8,
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Internal(_) => 1,
            Self::Validation(_) => 2,
            Self::Config(_) => 3,
            Self::Generation(_) => 4,
            Self::EmptyInput(_) => 5,
            Self::Io(_) => 6,
            Self::ExternalService(_) => 7,
        }
    }

    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            message: self.to_string(),
            exit_code: self.exit_code(),
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
