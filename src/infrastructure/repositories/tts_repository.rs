use crate::domain::speaker::VoiceIdentity;
use crate::domain::synthesis::{SynthesisError, SynthesisParameters};
use async_trait::async_trait;

/// Repository for voice synthesis of a single transcript line.
/// Abstracts the underlying provider (AWS Polly, OpenAI, a local model server, etc.)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Mapping the voice identity to a provider voice
/// - Returning one decodable WAV stream per call
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one line of text with the given voice
    ///
    /// `params.language` already holds the resolved ISO 639-1 code for the line.
    ///
    /// # Errors
    /// Returns `SynthesisError` if synthesis fails or the provider is unavailable
    async fn synthesize_line(
        &self,
        text: &str,
        voice: &VoiceIdentity,
        params: &SynthesisParameters,
    ) -> Result<Vec<u8>, SynthesisError>;
}
