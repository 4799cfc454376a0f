use crate::domain::synthesis::SynthesisOverrides;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceType {
    #[default]
    Preset,
    Custom,
}

impl VoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceType::Preset => "preset",
            VoiceType::Custom => "custom",
        }
    }
}

impl std::fmt::Display for VoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The voice a synthesis service should render a line with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceIdentity {
    pub voice_id: String,
    pub voice_type: VoiceType,
}

/// One voice assignment, as supplied in a brief's `voice_selections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    pub role: String,
    pub voice_id: String,
    #[serde(rename = "type", default)]
    pub voice_type: VoiceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,
    #[serde(default, skip_serializing_if = "SynthesisOverrides::is_empty")]
    pub overrides: SynthesisOverrides,
}

impl Speaker {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        voice_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            voice_id: voice_id.into(),
            voice_type: VoiceType::Preset,
            display_label: None,
            overrides: SynthesisOverrides::default(),
        }
    }

    pub fn with_voice_type(mut self, voice_type: VoiceType) -> Self {
        self.voice_type = voice_type;
        self
    }

    pub fn with_overrides(mut self, overrides: SynthesisOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Label shown to humans; falls back to "Name (Role)"
    pub fn label(&self) -> String {
        match &self.display_label {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ if self.role.is_empty() => self.name.clone(),
            _ => format!("{} ({})", self.name, self.role),
        }
    }

    pub fn voice(&self) -> VoiceIdentity {
        VoiceIdentity {
            voice_id: self.voice_id.clone(),
            voice_type: self.voice_type,
        }
    }
}
