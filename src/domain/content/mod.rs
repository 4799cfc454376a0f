pub mod error;
pub mod model;

pub use error::GenerationError;
pub use model::{ContentInput, Dialogue, Outline, OutlineSegment, Transcript};
