pub mod combiner;
pub mod error;
pub mod wav;

pub use combiner::{AudioCombiner, CombineOptions, CombinedAudio};
pub use error::CombineError;
