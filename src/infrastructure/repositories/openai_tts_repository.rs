use super::tts_repository::TtsRepository;
use crate::domain::audio::wav::wrap_pcm16_le;
use crate::domain::speaker::{VoiceIdentity, VoiceType};
use crate::domain::synthesis::text::split_into_batches;
use crate::domain::synthesis::{LanguageCode, SynthesisError, SynthesisParameters};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

/// `pcm` responses are 24 kHz 16-bit signed little-endian mono
const PCM_SAMPLE_RATE: u32 = 24_000;

pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    /// Fallback voice per language when the speaker's voice is not an OpenAI preset
    fn voice_for_language(language: LanguageCode) -> Voice {
        match language {
            LanguageCode::English => Voice::Alloy,
            LanguageCode::Spanish => Voice::Echo,
            LanguageCode::French => Voice::Nova,
            LanguageCode::German => Voice::Onyx,
            LanguageCode::Italian => Voice::Fable,
            LanguageCode::Portuguese => Voice::Shimmer,
        }
    }

    fn preset_voice(name: &str) -> Option<Voice> {
        match name.trim().to_lowercase().as_str() {
            "alloy" => Some(Voice::Alloy),
            "echo" => Some(Voice::Echo),
            "fable" => Some(Voice::Fable),
            "onyx" => Some(Voice::Onyx),
            "nova" => Some(Voice::Nova),
            "shimmer" => Some(Voice::Shimmer),
            _ => None,
        }
    }

    fn resolve_voice(voice: &VoiceIdentity, language: LanguageCode) -> Voice {
        match (voice.voice_type, Self::preset_voice(&voice.voice_id)) {
            (VoiceType::Preset, Some(preset)) => preset,
            _ => {
                tracing::debug!(
                    voice_id = %voice.voice_id,
                    voice_type = %voice.voice_type,
                    language = %language,
                    "Voice is not an OpenAI preset, using language default"
                );
                Self::voice_for_language(language)
            }
        }
    }

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    /// Call the speech endpoint for one batch, returning raw PCM
    async fn call_openai(
        &self,
        text: &str,
        voice: &Voice,
        speed: Option<f32>,
    ) -> Result<Vec<u8>, SynthesisError> {
        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice: voice.clone(),
            response_format: Some(SpeechResponseFormat::Pcm),
            speed,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                voice = ?voice,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            SynthesisError::failed(format!("OpenAI TTS error: {}", e))
        })?;

        Ok(response.bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
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
        let openai_voice = Self::resolve_voice(voice, language);
        let speed = params.speed.map(|s| s.clamp(0.25, 4.0));

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        let mut pcm = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_openai(batch, &openai_voice, speed).await?;
            tracing::debug!(
                batch_index = index,
                batch_audio_bytes = audio.len(),
                "OpenAI batch synthesized"
            );
            pcm.extend(audio);
        }

        let wav = wrap_pcm16_le(&pcm, PCM_SAMPLE_RATE)
            .map_err(|e| SynthesisError::failed(format!("failed to encode WAV: {}", e)))?;

        tracing::info!(
            provider = "openai",
            model = %self.model,
            voice = ?openai_voice,
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
