use crate::domain::content::{ContentInput, GenerationError, Outline, Transcript};
use crate::domain::speaker::SpeakerProfile;
use async_trait::async_trait;

/// Repository for the generative text service that writes the show.
///
/// Outline segment counts may differ from `num_segments`; callers treat that as a soft mismatch.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn generate_outline(&self, input: &ContentInput) -> Result<Outline, GenerationError>;

    async fn generate_transcript(
        &self,
        outline: &Outline,
        speakers: &SpeakerProfile,
        input: &ContentInput,
    ) -> Result<Transcript, GenerationError>;
}
