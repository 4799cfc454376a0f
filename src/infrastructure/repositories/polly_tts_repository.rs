use super::tts_repository::TtsRepository;
use crate::domain::audio::wav::wrap_pcm16_le;
use crate::domain::speaker::VoiceIdentity;
use crate::domain::synthesis::text::split_into_batches;
use crate::domain::synthesis::{LanguageCode, SynthesisError, SynthesisParameters};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// Polly PCM output is 16-bit signed little-endian mono
const PCM_SAMPLE_RATE: u32 = 16_000;

/// Voices that support the neural engine
const NEURAL_VOICES: &[&str] = &[
    "Joanna", "Matthew", "Ivy", "Kendra", "Kimberly", "Salli", "Joey", "Justin", "Kevin", "Ruth",
    "Stephen", "Amy", "Brian", "Emma", "Arthur", "Olivia", "Lupe", "Pedro", "Lucia", "Sergio",
    "Lea", "Remi", "Vicki", "Daniel", "Bianca", "Adriano", "Ines", "Camila", "Vitoria", "Thiago",
];

pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Polly voice used when a speaker has no explicit voice
    fn default_voice_for_language(language: LanguageCode) -> &'static str {
        match language {
            LanguageCode::English => "Joanna",
            LanguageCode::Spanish => "Lupe",
            LanguageCode::French => "Lea",
            LanguageCode::German => "Vicki",
            LanguageCode::Italian => "Bianca",
            LanguageCode::Portuguese => "Ines",
        }
    }

    fn engine_for_voice(voice_name: &str) -> Engine {
        if NEURAL_VOICES
            .iter()
            .any(|v| v.eq_ignore_ascii_case(voice_name))
        {
            Engine::Neural
        } else {
            Engine::Standard
        }
    }

    fn resolve_voice_name(voice: &VoiceIdentity, language: LanguageCode) -> String {
        let requested = voice.voice_id.trim();
        if requested.is_empty() || requested.eq_ignore_ascii_case("default") {
            Self::default_voice_for_language(language).to_string()
        } else {
            requested.to_string()
        }
    }

    /// Call AWS Polly for a single batch, returning raw PCM
    async fn call_polly(&self, text: &str, voice_name: &str) -> Result<Vec<u8>, SynthesisError> {
        let voice_id = VoiceId::from(voice_name);
        let engine = Self::engine_for_voice(voice_name);

        tracing::debug!(
            voice = voice_name,
            engine = ?engine,
            output_format = "Pcm",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Pcm)
            .sample_rate(PCM_SAMPLE_RATE.to_string())
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice = voice_name,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                SynthesisError::failed(format!("AWS Polly error: {}", e))
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            SynthesisError::failed(format!("failed to read Polly audio stream: {}", e))
        })?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize_line(
        &self,
        text: &str,
        voice: &VoiceIdentity,
        params: &SynthesisParameters,
    ) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();
        let language = params
            .language
            .parse::<LanguageCode>()
            .unwrap_or(LanguageCode::English);
        let voice_name = Self::resolve_voice_name(voice, language);

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        let mut pcm = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_polly(batch, &voice_name).await?;
            tracing::debug!(
                batch_index = index,
                batch_audio_bytes = audio.len(),
                "Polly batch synthesized"
            );
            pcm.extend(audio);
        }

        let wav = wrap_pcm16_le(&pcm, PCM_SAMPLE_RATE)
            .map_err(|e| SynthesisError::failed(format!("failed to encode WAV: {}", e)))?;

        tracing::info!(
            provider = "polly",
            voice = %voice_name,
            language = %language,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = wav.len(),
            "TTS synthesis completed"
        );

        Ok(wav)
    }
}
