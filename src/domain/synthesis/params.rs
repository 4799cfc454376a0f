use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Generation knobs applied to every line of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisParameters {
    pub model_name: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub max_new_tokens: u32,
    pub subtalker_temperature: f32,
    pub subtalker_top_k: u32,
    pub subtalker_top_p: f32,
    /// ISO 639-1 code, language name, or "auto"
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

impl Default for SynthesisParameters {
    fn default() -> Self {
        Self {
            model_name: "1.7B-CustomVoice".to_string(),
            temperature: 0.5,
            top_k: 30,
            top_p: 0.9,
            repetition_penalty: 1.0,
            max_new_tokens: 768,
            subtalker_temperature: 0.5,
            subtalker_top_k: 30,
            subtalker_top_p: 0.9,
            language: "en".to_string(),
            instruct: None,
            speed: None,
        }
    }
}

impl SynthesisParameters {
    /// Copy of `self` with every set override applied.
    pub fn merged(&self, overrides: &SynthesisOverrides) -> Self {
        let mut params = self.clone();
        overrides.apply_to(&mut params);
        params
    }
}

/// Partial parameter set; `None` leaves the underlying value untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtalker_temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtalker_top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtalker_top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

impl SynthesisOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, params: &mut SynthesisParameters) {
        if let Some(v) = &self.model_name {
            params.model_name = v.clone();
        }
        if let Some(v) = self.temperature {
            params.temperature = v;
        }
        if let Some(v) = self.top_k {
            params.top_k = v;
        }
        if let Some(v) = self.top_p {
            params.top_p = v;
        }
        if let Some(v) = self.repetition_penalty {
            params.repetition_penalty = v;
        }
        if let Some(v) = self.max_new_tokens {
            params.max_new_tokens = v;
        }
        if let Some(v) = self.subtalker_temperature {
            params.subtalker_temperature = v;
        }
        if let Some(v) = self.subtalker_top_k {
            params.subtalker_top_k = v;
        }
        if let Some(v) = self.subtalker_top_p {
            params.subtalker_top_p = v;
        }
        if let Some(v) = &self.language {
            params.language = v.clone();
        }
        if let Some(v) = &self.instruct {
            params.instruct = Some(v.clone());
        }
        if let Some(v) = self.speed {
            params.speed = Some(v);
        }
    }
}

/// Named bundle of overrides trading fidelity for speed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    #[default]
    Quick,
    Standard,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Quick => "quick",
            QualityPreset::Standard => "standard",
            QualityPreset::High => "high",
        }
    }

    /// Static override table for each preset
    pub fn overrides(&self) -> SynthesisOverrides {
        match self {
            QualityPreset::Quick => SynthesisOverrides {
                temperature: Some(0.5),
                top_k: Some(30),
                top_p: Some(0.9),
                max_new_tokens: Some(768),
                ..Default::default()
            },
            QualityPreset::Standard => SynthesisOverrides {
                temperature: Some(0.7),
                top_k: Some(50),
                top_p: Some(0.95),
                max_new_tokens: Some(1536),
                ..Default::default()
            },
            QualityPreset::High => SynthesisOverrides {
                temperature: Some(0.8),
                top_k: Some(50),
                top_p: Some(0.95),
                repetition_penalty: Some(1.05),
                max_new_tokens: Some(2048),
                subtalker_temperature: Some(0.7),
                subtalker_top_k: Some(50),
                subtalker_top_p: Some(0.95),
                ..Default::default()
            },
        }
    }
}

impl std::fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" | "fast" => Ok(QualityPreset::Quick),
            "standard" | "balanced" => Ok(QualityPreset::Standard),
            "high" | "best" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset: {}", other)),
        }
    }
}
