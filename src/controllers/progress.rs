//! Terminal rendering of pipeline progress.

use crate::domain::progress::{ProgressEvent, ProgressObserver, Stage, StageSummary};
use crate::domain::synthesis::ClipStatus;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Prints stage lines and a per-clip progress bar
#[derive(Default)]
pub struct ConsoleProgressObserver {
    clip_bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_bar(&self, total: usize, f: impl FnOnce(&ProgressBar)) {
        let Ok(mut guard) = self.clip_bar.lock() else {
            return;
        };
        let bar = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::with_template("  [{bar:30}] {pos}/{len} {msg}") {
                pb.set_style(style);
            }
            pb
        });
        f(bar);
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.clip_bar.lock().ok().and_then(|mut guard| guard.take())
    }
}

pub fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::GenerateOutline => "Outline",
        Stage::GenerateTranscript => "Transcript",
        Stage::GenerateClips => "Voice clips",
        Stage::CombineAudio => "Combine audio",
    }
}

pub fn describe_summary(summary: &StageSummary) -> String {
    match summary {
        StageSummary::Outline {
            segment_count,
            requested_segments,
            path,
        } => format!(
            "{} segments ({} requested) -> {}",
            segment_count,
            requested_segments,
            path.display()
        ),
        StageSummary::Transcript {
            dialogue_count,
            path,
        } => format!("{} lines -> {}", dialogue_count, path.display()),
        StageSummary::Clips {
            clip_count,
            success_count,
            error_count,
        } => format!(
            "{}/{} clips ok, {} failed",
            success_count, clip_count, error_count
        ),
        StageSummary::Combined {
            output_path,
            duration_secs,
            source_clip_count,
        } => format!(
            "{:.1}s from {} clips -> {}",
            duration_secs,
            source_clip_count,
            output_path.display()
        ),
    }
}

impl ProgressObserver for ConsoleProgressObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage } => {
                println!("> {}...", stage_label(*stage));
            }
            ProgressEvent::StageProgress { detail, .. } => {
                let marker = match detail.status {
                    ClipStatus::Success => "ok",
                    _ => "failed",
                };
                let message = format!(
                    "#{} {} [{}] {}",
                    detail.dialogue_index, detail.speaker, marker, detail.text_preview
                );
                self.with_bar(detail.total, |bar| {
                    bar.set_position(detail.current as u64);
                    bar.set_message(message);
                });
            }
            ProgressEvent::StageCompleted { stage, summary } => {
                if let Some(bar) = self.take_bar() {
                    bar.finish_and_clear();
                }
                println!("  {} done: {}", stage_label(*stage), describe_summary(summary));
            }
            ProgressEvent::StageFailed { stage, error } => {
                if let Some(bar) = self.take_bar() {
                    bar.abandon();
                }
                eprintln!("  {} failed: {}", stage_label(*stage), error);
            }
        }
    }
}
