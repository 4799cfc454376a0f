use super::dto::{PartialArtifacts, RunArtifacts, RunFailure, RunRequest};
use super::error::PipelineError;
use crate::domain::audio::{AudioCombiner, CombinedAudio};
use crate::domain::content::{GenerationError, Outline, Transcript};
use crate::domain::progress::{
    ProgressChannel, ProgressEvent, ProgressObserver, Stage, StageSummary,
};
use crate::domain::synthesis::{BatchOutcome, BatchSynthesizerApi};
use crate::infrastructure::repositories::ContentRepository;
use crate::infrastructure::storage::{write_json, RunLayout, RunStore};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

#[async_trait]
pub trait PipelineOrchestratorApi: Send + Sync {
    /// Produce a finished episode from a brief and a speaker profile
    ///
    /// This operation:
    /// - Validates the request before any stage runs
    /// - Runs outline, transcript, clip synthesis and combine strictly in order
    /// - Persists every intermediate artifact as soon as it exists
    ///
    /// Individual clip failures are reported as data on the returned clip set.
    /// Any stage failure aborts the run and returns the progress history.
    async fn run(
        &self,
        request: RunRequest,
        observer: &dyn ProgressObserver,
    ) -> Result<RunArtifacts, RunFailure>;
}

pub struct PipelineOrchestrator {
    content_repo: Arc<dyn ContentRepository>,
    synthesizer: Arc<dyn BatchSynthesizerApi>,
    combiner: AudioCombiner,
    store: RunStore,
}

impl PipelineOrchestrator {
    pub fn new(
        content_repo: Arc<dyn ContentRepository>,
        synthesizer: Arc<dyn BatchSynthesizerApi>,
        combiner: AudioCombiner,
        store: RunStore,
    ) -> Self {
        Self {
            content_repo,
            synthesizer,
            combiner,
            store,
        }
    }
}

/// Per-run bookkeeping shared by the stage helpers
struct RunContext<'a> {
    progress: ProgressChannel<'a>,
    partial: PartialArtifacts,
}

impl<'a> RunContext<'a> {
    fn start(&mut self, stage: Stage) -> Instant {
        tracing::info!(stage = %stage, "Stage started");
        self.progress.emit(ProgressEvent::StageStarted { stage });
        Instant::now()
    }

    fn complete(&mut self, stage: Stage, started: Instant, summary: StageSummary) {
        tracing::info!(
            stage = %stage,
            latency_ms = started.elapsed().as_millis(),
            "Stage completed"
        );
        self.progress
            .emit(ProgressEvent::StageCompleted { stage, summary });
    }

    fn fail(mut self, stage: Stage, error: PipelineError) -> RunFailure {
        tracing::error!(stage = %stage, error = %error, "Stage failed, aborting run");
        self.progress.emit(ProgressEvent::StageFailed {
            stage,
            error: error.to_string(),
        });
        RunFailure {
            error,
            failed_stage: Some(stage),
            partial: self.partial,
            history: self.progress.into_history(),
        }
    }
}

#[async_trait]
impl PipelineOrchestratorApi for PipelineOrchestrator {
    async fn run(
        &self,
        request: RunRequest,
        observer: &dyn ProgressObserver,
    ) -> Result<RunArtifacts, RunFailure> {
        let run_started = Instant::now();

        // 1. Validate before anything executes; no events on rejection
        if let Err(error) = validate(&request) {
            tracing::warn!(error = %error, "Run request rejected");
            return Err(RunFailure {
                error,
                failed_stage: None,
                partial: PartialArtifacts::default(),
                history: Vec::new(),
            });
        }

        // 2. Prepare the run directory
        let run_id = Uuid::new_v4();
        let layout = match self.store.prepare(run_id, Utc::now()).await {
            Ok(layout) => layout,
            Err(e) => {
                let error = PipelineError::io_write(self.store.root(), e);
                tracing::error!(
                    run_id = %run_id,
                    error = %error,
                    "Could not prepare run directory"
                );
                return Err(RunFailure {
                    error,
                    failed_stage: None,
                    partial: PartialArtifacts::default(),
                    history: Vec::new(),
                });
            }
        };

        tracing::info!(
            run_id = %run_id,
            run_dir = %layout.dir.display(),
            topic = %request.content_input.topic,
            num_segments = request.content_input.num_segments,
            speaker_count = request.speaker_profile.len(),
            quality_preset = %request.quality_preset,
            "Pipeline run started"
        );

        let mut ctx = RunContext {
            progress: ProgressChannel::new(observer),
            partial: PartialArtifacts {
                run_dir: Some(layout.dir.clone()),
                ..Default::default()
            },
        };

        // 3. Outline
        let outline = match self.outline_stage(&request, &layout, &mut ctx).await {
            Ok(outline) => outline,
            Err(error) => return Err(ctx.fail(Stage::GenerateOutline, error)),
        };

        // 4. Transcript
        let transcript = match self
            .transcript_stage(&request, &outline, &layout, &mut ctx)
            .await
        {
            Ok(transcript) => transcript,
            Err(error) => return Err(ctx.fail(Stage::GenerateTranscript, error)),
        };

        // 5. Clips; line failures stay on the clip set
        let outcome = match self
            .clips_stage(&request, &transcript, &layout, &mut ctx)
            .await
        {
            Ok(outcome) => outcome,
            Err(error) => return Err(ctx.fail(Stage::GenerateClips, error)),
        };

        // 6. Combine
        let combined = match self.combine_stage(&outcome, &layout, &mut ctx).await {
            Ok(combined) => combined,
            Err(error) => return Err(ctx.fail(Stage::CombineAudio, error)),
        };

        tracing::info!(
            run_id = %run_id,
            output = %combined.output_path.display(),
            clip_count = outcome.clips.len(),
            success_count = outcome.success_count,
            error_count = outcome.error_count,
            duration_secs = combined.duration_secs,
            latency_ms = run_started.elapsed().as_millis(),
            "Pipeline run completed"
        );

        Ok(RunArtifacts {
            run_id,
            run_dir: layout.dir.clone(),
            outline_path: layout.outline_path.clone(),
            transcript_path: layout.transcript_path.clone(),
            clip_paths: outcome.clips.success_paths(),
            clip_manifest_path: layout.clip_manifest_path.clone(),
            combined_audio_path: combined.output_path.clone(),
            combined,
            outline,
            transcript,
            clips: outcome.clips,
            history: ctx.progress.into_history(),
        })
    }
}

fn validate(request: &RunRequest) -> Result<(), PipelineError> {
    request
        .content_input
        .validate()
        .map_err(PipelineError::Validation)?;
    request.speaker_profile.validate_voices()?;
    Ok(())
}

impl PipelineOrchestrator {
    async fn outline_stage(
        &self,
        request: &RunRequest,
        layout: &RunLayout,
        ctx: &mut RunContext<'_>,
    ) -> Result<Outline, PipelineError> {
        let started = ctx.start(Stage::GenerateOutline);
        let requested = request.content_input.num_segments;

        let outline = self
            .content_repo
            .generate_outline(&request.content_input)
            .await?;

        if outline.segment_count() != requested as usize {
            tracing::warn!(
                requested_segments = requested,
                segment_count = outline.segment_count(),
                "Outline segment count differs from request, continuing"
            );
        }

        write_json(&layout.outline_path, &outline)
            .await
            .map_err(|e| PipelineError::io_write(&layout.outline_path, e))?;
        ctx.partial.outline_path = Some(layout.outline_path.clone());

        ctx.complete(
            Stage::GenerateOutline,
            started,
            StageSummary::Outline {
                segment_count: outline.segment_count(),
                requested_segments: requested,
                path: layout.outline_path.clone(),
            },
        );
        Ok(outline)
    }

    async fn transcript_stage(
        &self,
        request: &RunRequest,
        outline: &Outline,
        layout: &RunLayout,
        ctx: &mut RunContext<'_>,
    ) -> Result<Transcript, PipelineError> {
        let started = ctx.start(Stage::GenerateTranscript);

        let transcript = self
            .content_repo
            .generate_transcript(outline, &request.speaker_profile, &request.content_input)
            .await?;

        if transcript.is_empty() {
            let error = GenerationError::Malformed("transcript has no dialogue lines".to_string());
            return Err(error.into());
        }
        transcript
            .validate_speakers(&request.speaker_profile)
            .map_err(|e| GenerationError::Malformed(format!("transcript rejected: {}", e)))?;

        write_json(&layout.transcript_path, &transcript)
            .await
            .map_err(|e| PipelineError::io_write(&layout.transcript_path, e))?;
        ctx.partial.transcript_path = Some(layout.transcript_path.clone());

        ctx.complete(
            Stage::GenerateTranscript,
            started,
            StageSummary::Transcript {
                dialogue_count: transcript.len(),
                path: layout.transcript_path.clone(),
            },
        );
        Ok(transcript)
    }

    async fn clips_stage(
        &self,
        request: &RunRequest,
        transcript: &Transcript,
        layout: &RunLayout,
        ctx: &mut RunContext<'_>,
    ) -> Result<BatchOutcome, PipelineError> {
        let started = ctx.start(Stage::GenerateClips);

        let params = request
            .synthesis_parameters
            .merged(&request.quality_preset.overrides());

        let outcome = self
            .synthesizer
            .synthesize(
                transcript,
                &request.speaker_profile,
                &params,
                &layout.clips_dir,
                &mut ctx.progress,
            )
            .await?;
        ctx.partial.clip_paths = outcome.clips.success_paths();

        write_json(&layout.clip_manifest_path, &outcome.clips)
            .await
            .map_err(|e| PipelineError::io_write(&layout.clip_manifest_path, e))?;
        ctx.partial.clip_manifest_path = Some(layout.clip_manifest_path.clone());

        ctx.complete(
            Stage::GenerateClips,
            started,
            StageSummary::Clips {
                clip_count: outcome.clips.len(),
                success_count: outcome.success_count,
                error_count: outcome.error_count,
            },
        );
        Ok(outcome)
    }

    async fn combine_stage(
        &self,
        outcome: &BatchOutcome,
        layout: &RunLayout,
        ctx: &mut RunContext<'_>,
    ) -> Result<CombinedAudio, PipelineError> {
        let started = ctx.start(Stage::CombineAudio);

        let combiner = self.combiner.clone();
        let clips = outcome.clips.clone();
        let output = layout.combined_path.clone();
        let combined =
            tokio::task::spawn_blocking(move || combiner.combine_clip_set(&clips, &output))
                .await
                .map_err(|e| PipelineError::Internal(format!("combine task failed: {}", e)))??;

        ctx.complete(
            Stage::CombineAudio,
            started,
            StageSummary::Combined {
                output_path: combined.output_path.clone(),
                duration_secs: combined.duration_secs,
                source_clip_count: combined.source_clip_count,
            },
        );
        Ok(combined)
    }
}
