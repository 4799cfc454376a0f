pub mod dto;
pub mod error;
pub mod service;

pub use dto::{PartialArtifacts, RunArtifacts, RunFailure, RunRequest};
pub use error::PipelineError;
pub use service::{PipelineOrchestrator, PipelineOrchestratorApi};
