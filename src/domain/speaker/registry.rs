//! Speaker registry for a single run.

use super::error::SpeakerError;
use super::model::Speaker;
use std::collections::HashMap;

/// Ordered, read-only set of speakers keyed by name.
#[derive(Debug, Clone)]
pub struct SpeakerProfile {
    speakers: Vec<Speaker>,
    by_name: HashMap<String, usize>,
}

impl SpeakerProfile {
    /// Build a profile; fails on duplicate names.
    pub fn new(speakers: Vec<Speaker>) -> Result<Self, SpeakerError> {
        let mut by_name = HashMap::with_capacity(speakers.len());
        for (position, speaker) in speakers.iter().enumerate() {
            if by_name.insert(speaker.name.clone(), position).is_some() {
                return Err(SpeakerError::DuplicateSpeaker(speaker.name.clone()));
            }
        }

        Ok(Self { speakers, by_name })
    }

    /// Look up a speaker by name.
    ///
    /// Exact matches win. Otherwise a case-insensitive match is accepted only
    /// when exactly one registered name matches.
    pub fn resolve(&self, name: &str) -> Result<&Speaker, SpeakerError> {
        if let Some(&position) = self.by_name.get(name) {
            return Ok(&self.speakers[position]);
        }

        let wanted = name.trim();
        let mut matches = self
            .speakers
            .iter()
            .filter(|s| s.name.eq_ignore_ascii_case(wanted));
        match (matches.next(), matches.next()) {
            (Some(speaker), None) => Ok(speaker),
            _ => Err(SpeakerError::UnknownSpeaker(name.to_string())),
        }
    }

    /// Every speaker must carry a non-blank voice id.
    pub fn validate_voices(&self) -> Result<(), SpeakerError> {
        if self.speakers.is_empty() {
            return Err(SpeakerError::EmptyProfile);
        }
        match self.speakers.iter().find(|s| s.voice_id.trim().is_empty()) {
            Some(speaker) => Err(SpeakerError::MissingVoice(speaker.name.clone())),
            None => Ok(()),
        }
    }

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.speakers.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}
