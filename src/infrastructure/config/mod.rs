use crate::error::AppError;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub output_dir: PathBuf,
    pub log_format: LogFormat,
    // Content generation
    pub content_model: String,
    // Voice synthesis
    pub tts_provider: TtsProvider,
    pub openai_tts_model: String,
    pub aws_region: String,
    // Batch synthesis
    pub synthesis_max_concurrent: usize,
    pub synthesis_timeout_secs: u64,
    pub synthesis_retry_attempts: u32,
    // Audio assembly
    pub inter_clip_silence_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    OpenAi,
    Polly,
}

impl FromStr for TtsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(TtsProvider::OpenAi),
            "polly" | "aws" => Ok(TtsProvider::Polly),
            other => Err(format!("unknown TTS provider '{}' (expected openai or polly)", other)),
        }
    }
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| AppError::Config(format!("{}={}: {}", name, raw, e)))
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Config {
            output_dir: PathBuf::from(
                env::var("OUTPUT_DIR").unwrap_or_else(|_| "./podcasts".to_string()),
            ),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            content_model: env::var("CONTENT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            tts_provider: parse_var("TTS_PROVIDER", "openai")?,
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            synthesis_max_concurrent: parse_var("SYNTHESIS_MAX_CONCURRENT", "4")?,
            synthesis_timeout_secs: parse_var("SYNTHESIS_TIMEOUT_SECS", "120")?,
            synthesis_retry_attempts: parse_var("SYNTHESIS_RETRY_ATTEMPTS", "0")?,
            inter_clip_silence_ms: parse_var("INTER_CLIP_SILENCE_MS", "300")?,
        };

        if config.synthesis_max_concurrent == 0 {
            return Err(AppError::Config(
                "SYNTHESIS_MAX_CONCURRENT must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }

    pub fn inter_clip_silence(&self) -> Duration {
        Duration::from_millis(self.inter_clip_silence_ms)
    }
}
