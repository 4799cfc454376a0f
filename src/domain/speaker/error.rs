use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeakerError {
    #[error("unknown speaker: {0}")]
    UnknownSpeaker(String),
    #[error("duplicate speaker: {0}")]
    DuplicateSpeaker(String),
    #[error("speaker {0} has no voice identity")]
    MissingVoice(String),
    #[error("speaker profile is empty")]
    EmptyProfile,
}

impl From<SpeakerError> for AppError {
    fn from(err: SpeakerError) -> Self {
        AppError::Validation(err.to_string())
    }
}
