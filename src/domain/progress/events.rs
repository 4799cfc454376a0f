//! Lifecycle events emitted while a run executes.

use crate::domain::synthesis::ClipStatus;
use serde::Serialize;
use std::path::PathBuf;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GenerateOutline,
    GenerateTranscript,
    GenerateClips,
    CombineAudio,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::GenerateOutline => "generate_outline",
            Stage::GenerateTranscript => "generate_transcript",
            Stage::GenerateClips => "generate_clips",
            Stage::CombineAudio => "combine_audio",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Started,
    Progress,
    Completed,
    Failed,
}

/// Per-clip completion detail for the synthesis stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipProgress {
    /// Completed so far, 1-based
    pub current: usize,
    pub total: usize,
    pub dialogue_index: usize,
    pub speaker: String,
    pub text_preview: String,
    pub status: ClipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Stage-specific summary attached to a completed event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageSummary {
    Outline {
        segment_count: usize,
        requested_segments: u32,
        path: PathBuf,
    },
    Transcript {
        dialogue_count: usize,
        path: PathBuf,
    },
    Clips {
        clip_count: usize,
        success_count: usize,
        error_count: usize,
    },
    Combined {
        output_path: PathBuf,
        duration_secs: f64,
        source_clip_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    StageStarted {
        stage: Stage,
    },
    StageProgress {
        stage: Stage,
        detail: ClipProgress,
    },
    StageCompleted {
        stage: Stage,
        summary: StageSummary,
    },
    StageFailed {
        stage: Stage,
        error: String,
    },
}

impl ProgressEvent {
    pub fn stage(&self) -> Stage {
        match self {
            ProgressEvent::StageStarted { stage }
            | ProgressEvent::StageProgress { stage, .. }
            | ProgressEvent::StageCompleted { stage, .. }
            | ProgressEvent::StageFailed { stage, .. } => *stage,
        }
    }

    pub fn status(&self) -> EventStatus {
        match self {
            ProgressEvent::StageStarted { .. } => EventStatus::Started,
            ProgressEvent::StageProgress { .. } => EventStatus::Progress,
            ProgressEvent::StageCompleted { .. } => EventStatus::Completed,
            ProgressEvent::StageFailed { .. } => EventStatus::Failed,
        }
    }
}
