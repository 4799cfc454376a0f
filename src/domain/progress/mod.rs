pub mod events;
pub mod observer;

pub use events::{ClipProgress, EventStatus, ProgressEvent, Stage, StageSummary};
pub use observer::{NoopObserver, ProgressChannel, ProgressObserver};
