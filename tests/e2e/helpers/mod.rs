use podcast_studio::domain::audio::{AudioCombiner, CombineOptions};
use podcast_studio::domain::pipeline::PipelineOrchestrator;
use podcast_studio::domain::progress::{ProgressEvent, ProgressObserver};
use podcast_studio::domain::synthesis::{BatchClipSynthesizer, BatchConfig};
use podcast_studio::infrastructure::storage::RunStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub mod fixtures;
pub mod mocks;

use mocks::{MockContentRepository, MockTtsRepository};

/// Silence between clips in the e2e runs: 10 ms at 8 kHz
pub const TEST_SILENCE: Duration = Duration::from_millis(10);
pub const TEST_SILENCE_FRAMES: usize = 80;

pub struct TestContext {
    pub output: TempDir,
    pub content: Arc<MockContentRepository>,
    pub tts: Arc<MockTtsRepository>,
    pub orchestrator: PipelineOrchestrator,
}

impl TestContext {
    pub fn new(content: MockContentRepository, tts: MockTtsRepository) -> Self {
        Self::with_config(content, tts, BatchConfig::default())
    }

    pub fn with_config(
        content: MockContentRepository,
        tts: MockTtsRepository,
        config: BatchConfig,
    ) -> Self {
        let output = tempfile::tempdir().unwrap();
        let content = Arc::new(content);
        let tts = Arc::new(tts);
        let synthesizer = Arc::new(BatchClipSynthesizer::new(tts.clone(), config));
        let orchestrator = PipelineOrchestrator::new(
            content.clone(),
            synthesizer,
            AudioCombiner::new(CombineOptions {
                inter_clip_silence: TEST_SILENCE,
            }),
            RunStore::new(output.path()),
        );

        Self {
            output,
            content,
            tts,
            orchestrator,
        }
    }

    /// Run directories created under the output root
    pub fn run_dirs(&self) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(self.output.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}

/// Observer that keeps its own copy of every event
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<ProgressEvent>>,
}

impl ProgressObserver for RecordingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
