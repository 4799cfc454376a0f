use crate::domain::content::{Dialogue, Transcript};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipStatus {
    Pending,
    Success,
    Error,
}

impl ClipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipStatus::Pending => "pending",
            ClipStatus::Success => "success",
            ClipStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ClipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synthesis outcome for one transcript line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub dialogue_index: usize,
    pub speaker: String,
    pub text: String,
    pub status: ClipStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub attempts: u32,
}

impl Clip {
    pub fn pending(dialogue_index: usize, dialogue: &Dialogue) -> Self {
        Self {
            dialogue_index,
            speaker: dialogue.speaker.clone(),
            text: dialogue.text.clone(),
            status: ClipStatus::Pending,
            path: None,
            error: None,
            attempts: 0,
        }
    }

    pub fn succeeded(mut self, path: PathBuf, attempts: u32) -> Self {
        self.status = ClipStatus::Success;
        self.path = Some(path);
        self.error = None;
        self.attempts = attempts;
        self
    }

    pub fn failed(mut self, error: impl Into<String>, attempts: u32) -> Self {
        self.status = ClipStatus::Error;
        self.path = None;
        self.error = Some(error.into());
        self.attempts = attempts;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ClipStatus::Success
    }
}

/// One clip per transcript line, stored at `clips[dialogue_index]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipSet {
    clips: Vec<Clip>,
}

impl ClipSet {
    /// Every line starts out pending.
    pub fn pending(transcript: &Transcript) -> Self {
        let clips = transcript
            .dialogues
            .iter()
            .enumerate()
            .map(|(index, dialogue)| Clip::pending(index, dialogue))
            .collect();
        Self { clips }
    }

    /// Store a finished clip in its slot. Out-of-range indices are ignored.
    pub fn record(&mut self, clip: Clip) -> bool {
        match self.clips.get_mut(clip.dialogue_index) {
            Some(slot) => {
                *slot = clip;
                true
            }
            None => false,
        }
    }

    /// Clips that never reached a final status
    pub fn unresolved(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(|c| c.status == ClipStatus::Pending)
    }

    pub fn get(&self, dialogue_index: usize) -> Option<&Clip> {
        self.clips.get(dialogue_index)
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Successful clips in `dialogue_index` order
    pub fn successful(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(|c| c.is_success())
    }

    pub fn success_paths(&self) -> Vec<PathBuf> {
        self.successful().filter_map(|c| c.path.clone()).collect()
    }

    pub fn success_count(&self) -> usize {
        self.successful().count()
    }

    pub fn error_count(&self) -> usize {
        self.clips
            .iter()
            .filter(|c| c.status == ClipStatus::Error)
            .count()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
