use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ISO 639-1 language codes supported by the synthesis backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
}

impl LanguageCode {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
        }
    }

    /// Convert lingua Language to LanguageCode
    pub fn from_lingua(language: Language) -> Self {
        match language {
            Language::English => LanguageCode::English,
            Language::Spanish => LanguageCode::Spanish,
            Language::French => LanguageCode::French,
            Language::German => LanguageCode::German,
            Language::Italian => LanguageCode::Italian,
            Language::Portuguese => LanguageCode::Portuguese,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = String;

    /// Accepts ISO codes ("en", "en-US") and English names ("English")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let primary = lowered.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "en" | "english" => Ok(LanguageCode::English),
            "es" | "spanish" => Ok(LanguageCode::Spanish),
            "fr" | "french" => Ok(LanguageCode::French),
            "de" | "german" => Ok(LanguageCode::German),
            "it" | "italian" => Ok(LanguageCode::Italian),
            "pt" | "portuguese" => Ok(LanguageCode::Portuguese),
            _ => Err(format!("unsupported language: {}", s)),
        }
    }
}

/// Picks the language each line is synthesized in
pub struct LanguageResolver {
    detector: LanguageDetector,
}

impl Default for LanguageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageResolver {
    pub fn new() -> Self {
        // Build detector with our supported languages
        let detector = LanguageDetectorBuilder::from_languages(&[
            Language::English,
            Language::Spanish,
            Language::French,
            Language::German,
            Language::Italian,
            Language::Portuguese,
        ])
        .build();

        Self { detector }
    }

    /// Line override, then the batch language, then detection for "auto".
    ///
    /// Unparseable explicit values fall through to detection.
    pub fn resolve(
        &self,
        line_override: Option<&str>,
        batch_language: &str,
        text: &str,
    ) -> LanguageCode {
        for candidate in line_override.into_iter().chain(std::iter::once(batch_language)) {
            if candidate.trim().eq_ignore_ascii_case("auto") {
                continue;
            }
            match candidate.parse::<LanguageCode>() {
                Ok(code) => return code,
                Err(e) => tracing::warn!(error = %e, "Ignoring language tag"),
            }
        }
        self.detect(text)
    }

    /// Detect the language of the given text, defaulting to English
    pub fn detect(&self, text: &str) -> LanguageCode {
        match self.detector.detect_language_of(text) {
            Some(language) => LanguageCode::from_lingua(language),
            None => {
                tracing::warn!("Could not detect language, falling back to English");
                LanguageCode::English
            }
        }
    }
}
