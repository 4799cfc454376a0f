use crate::domain::speaker::{SpeakerError, SpeakerProfile};
use serde::{Deserialize, Serialize};

/// The brief handed to the outline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInput {
    pub topic: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub briefing: String,
    pub num_segments: u32,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "English".to_string()
}

impl ContentInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.num_segments < 1 {
            return Err("num_segments must be at least 1".to_string());
        }
        if self.topic.trim().is_empty() {
            return Err("topic cannot be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineSegment {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// High-level plan produced by the content service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub segments: Vec<OutlineSegment>,
}

impl Outline {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// One speaker-attributed line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    pub speaker: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Dialogue {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Ordered dialogue; position in `dialogues` is the line's `dialogue_index`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub dialogues: Vec<Dialogue>,
}

impl Transcript {
    pub fn new(dialogues: Vec<Dialogue>) -> Self {
        Self { dialogues }
    }

    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    /// Every line's speaker must resolve in the profile.
    pub fn validate_speakers(&self, profile: &SpeakerProfile) -> Result<(), SpeakerError> {
        self.dialogues
            .iter()
            .try_for_each(|d| profile.resolve(&d.speaker).map(|_| ()))
    }
}
