use async_trait::async_trait;
use podcast_studio::domain::audio::wav::encode_pcm16;
use podcast_studio::domain::content::{ContentInput, GenerationError, Outline, Transcript};
use podcast_studio::domain::speaker::{SpeakerProfile, VoiceIdentity};
use podcast_studio::domain::synthesis::{SynthesisError, SynthesisParameters};
use podcast_studio::infrastructure::repositories::{ContentRepository, TtsRepository};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const MOCK_SAMPLE_RATE: u32 = 8_000;
pub const MOCK_CLIP_SAMPLES: usize = 8;

/// Constant sample value a mock clip is filled with, derived from its text
pub fn tone_for(text: &str) -> i16 {
    (text.bytes().map(|b| b as u32).sum::<u32>() % 1000 + 1) as i16
}

pub enum Scripted<T> {
    Ok(T),
    Dependency(String),
}

pub struct MockContentRepository {
    outline: Mutex<Option<Scripted<Outline>>>,
    transcript: Mutex<Option<Scripted<Transcript>>>,
    pub outline_calls: AtomicUsize,
    pub transcript_calls: AtomicUsize,
}

impl MockContentRepository {
    pub fn new(outline: Outline, transcript: Transcript) -> Self {
        Self {
            outline: Mutex::new(Some(Scripted::Ok(outline))),
            transcript: Mutex::new(Some(Scripted::Ok(transcript))),
            outline_calls: AtomicUsize::new(0),
            transcript_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_outline(self, reason: &str) -> Self {
        *self.outline.lock().unwrap() = Some(Scripted::Dependency(reason.to_string()));
        self
    }

    pub fn failing_transcript(self, reason: &str) -> Self {
        *self.transcript.lock().unwrap() = Some(Scripted::Dependency(reason.to_string()));
        self
    }

    pub fn calls(&self) -> (usize, usize) {
        (
            self.outline_calls.load(Ordering::SeqCst),
            self.transcript_calls.load(Ordering::SeqCst),
        )
    }
}

fn take<T: Clone>(slot: &Mutex<Option<Scripted<T>>>) -> Result<T, GenerationError> {
    match slot.lock().unwrap().as_ref() {
        Some(Scripted::Ok(value)) => Ok(value.clone()),
        Some(Scripted::Dependency(reason)) => Err(GenerationError::Dependency(reason.clone())),
        None => Err(GenerationError::Malformed("nothing scripted".to_string())),
    }
}

#[async_trait]
impl ContentRepository for MockContentRepository {
    async fn generate_outline(&self, _input: &ContentInput) -> Result<Outline, GenerationError> {
        self.outline_calls.fetch_add(1, Ordering::SeqCst);
        take(&self.outline)
    }

    async fn generate_transcript(
        &self,
        _outline: &Outline,
        _speakers: &SpeakerProfile,
        _input: &ContentInput,
    ) -> Result<Transcript, GenerationError> {
        self.transcript_calls.fetch_add(1, Ordering::SeqCst);
        take(&self.transcript)
    }
}

/// A synthesis request as the mock service saw it
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub text: String,
    pub voice_id: String,
    pub params: SynthesisParameters,
}

#[derive(Default)]
pub struct MockTtsRepository {
    failing: HashSet<String>,
    delays_ms: HashMap<String, u64>,
    pub seen: Mutex<Vec<SeenRequest>>,
}

impl MockTtsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn with_delay(mut self, text: &str, delay_ms: u64) -> Self {
        self.delays_ms.insert(text.to_string(), delay_ms);
        self
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsRepository for MockTtsRepository {
    async fn synthesize_line(
        &self,
        text: &str,
        voice: &VoiceIdentity,
        params: &SynthesisParameters,
    ) -> Result<Vec<u8>, SynthesisError> {
        self.seen.lock().unwrap().push(SeenRequest {
            text: text.to_string(),
            voice_id: voice.voice_id.clone(),
            params: params.clone(),
        });

        let delay = self.delays_ms.get(text).copied().unwrap_or(1);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        if self.failing.contains(text) {
            return Err(SynthesisError::failed(format!("voice service rejected '{}'", text)));
        }
        Ok(encode_pcm16(&[tone_for(text); MOCK_CLIP_SAMPLES], MOCK_SAMPLE_RATE).unwrap())
    }
}
