pub mod clip;
pub mod error;
pub mod language;
pub mod params;
pub mod service;
pub mod text;

pub use clip::{Clip, ClipSet, ClipStatus};
pub use error::SynthesisError;
pub use language::{LanguageCode, LanguageResolver};
pub use params::{QualityPreset, SynthesisOverrides, SynthesisParameters};
pub use service::{BatchClipSynthesizer, BatchConfig, BatchOutcome, BatchSynthesizerApi};
