pub mod audio;
pub mod content;
pub mod pipeline;
pub mod progress;
pub mod speaker;
pub mod synthesis;
