use std::time::Duration;

/// Failure of a single line; recorded on its clip, never fatal to the run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    #[error("synthesis failed: {reason}")]
    Failed { reason: String },
    #[error("synthesis timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("failed to store clip: {0}")]
    Storage(String),
}

impl SynthesisError {
    pub fn failed(reason: impl Into<String>) -> Self {
        SynthesisError::Failed {
            reason: reason.into(),
        }
    }
}
