use super::events::ProgressEvent;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Caller-supplied sink for progress events.
///
/// Implementations must not block for long; they run on the pipeline task.
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Observer that ignores everything
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Forwards events to an observer and keeps the full history for the caller.
///
/// A panicking observer is logged and otherwise ignored.
pub struct ProgressChannel<'a> {
    observer: &'a dyn ProgressObserver,
    history: Vec<ProgressEvent>,
}

impl<'a> ProgressChannel<'a> {
    pub fn new(observer: &'a dyn ProgressObserver) -> Self {
        Self {
            observer,
            history: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: ProgressEvent) {
        let observer = self.observer;
        if catch_unwind(AssertUnwindSafe(|| observer.on_event(&event))).is_err() {
            tracing::warn!(
                stage = %event.stage(),
                status = ?event.status(),
                "Progress observer panicked; event dropped for observer"
            );
        }
        self.history.push(event);
    }

    pub fn history(&self) -> &[ProgressEvent] {
        &self.history
    }

    pub fn into_history(self) -> Vec<ProgressEvent> {
        self.history
    }
}
