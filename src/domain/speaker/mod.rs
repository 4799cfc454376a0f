pub mod error;
pub mod model;
pub mod registry;

pub use error::SpeakerError;
pub use model::{Speaker, VoiceIdentity, VoiceType};
pub use registry::SpeakerProfile;
