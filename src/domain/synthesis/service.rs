//! Batch clip synthesis with bounded concurrency.
//!
//! Lines are dispatched in transcript order to a fixed-size worker pool.
//! Workers report finished clips over a completion channel; the collector
//! writes each clip into its `dialogue_index` slot, so the resulting
//! [`ClipSet`] is ordered by transcript position whatever the completion
//! order was. A failed line never cancels its siblings.

use super::clip::{Clip, ClipSet, ClipStatus};
use super::error::SynthesisError;
use super::language::LanguageResolver;
use super::params::SynthesisParameters;
use super::text::{clean_line, preview};
use crate::domain::content::{Dialogue, Transcript};
use crate::domain::pipeline::PipelineError;
use crate::domain::progress::{ClipProgress, ProgressChannel, ProgressEvent, Stage};
use crate::domain::speaker::{SpeakerProfile, VoiceIdentity};
use crate::infrastructure::repositories::TtsRepository;
use crate::infrastructure::storage::{clip_file_name, write_atomic};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Default maximum number of concurrent synthesis requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const PREVIEW_CHARS: usize = 40;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Worker pool size, independent of transcript length
    pub max_concurrent: usize,
    /// Per-request timeout; a timeout counts as a failed line
    pub request_timeout: Duration,
    /// Extra attempts after the first failure (0 = no retry)
    pub retry_attempts: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_attempts: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub clips: ClipSet,
    pub success_count: usize,
    pub error_count: usize,
}

#[async_trait]
pub trait BatchSynthesizerApi: Send + Sync {
    /// Synthesize every transcript line into `clips_dir`
    ///
    /// This operation:
    /// - Rejects an empty transcript or unknown speakers before any service call
    /// - Dispatches one request per line with bounded parallelism
    /// - Emits one progress event per completed line
    ///
    /// Line failures are recorded on their clips; only validation and
    /// storage setup errors fail the batch.
    async fn synthesize(
        &self,
        transcript: &Transcript,
        speakers: &SpeakerProfile,
        params: &SynthesisParameters,
        clips_dir: &Path,
        progress: &mut ProgressChannel<'_>,
    ) -> Result<BatchOutcome, PipelineError>;
}

pub struct BatchClipSynthesizer {
    tts_repo: Arc<dyn TtsRepository>,
    config: BatchConfig,
    language_resolver: LanguageResolver,
}

impl BatchClipSynthesizer {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, config: BatchConfig) -> Self {
        Self {
            tts_repo,
            config,
            language_resolver: LanguageResolver::new(),
        }
    }
}

/// Everything a worker needs to produce one clip
struct LineJob {
    clip: Clip,
    text: String,
    voice: VoiceIdentity,
    params: SynthesisParameters,
    path: PathBuf,
}

/// Fan-in side: owns the clip slots and the completion counter
struct BatchCollector {
    clips: ClipSet,
    completed: usize,
    total: usize,
}

impl BatchCollector {
    fn record(&mut self, clip: Clip, progress: &mut ProgressChannel<'_>) {
        self.completed += 1;

        match clip.status {
            ClipStatus::Success => tracing::info!(
                dialogue_index = clip.dialogue_index,
                speaker = %clip.speaker,
                attempts = clip.attempts,
                completed = self.completed,
                total = self.total,
                "Clip synthesized"
            ),
            _ => tracing::warn!(
                dialogue_index = clip.dialogue_index,
                speaker = %clip.speaker,
                error = clip.error.as_deref().unwrap_or("unknown"),
                completed = self.completed,
                total = self.total,
                "Clip failed"
            ),
        }

        progress.emit(ProgressEvent::StageProgress {
            stage: Stage::GenerateClips,
            detail: ClipProgress {
                current: self.completed,
                total: self.total,
                dialogue_index: clip.dialogue_index,
                speaker: clip.speaker.clone(),
                text_preview: preview(&clip.text, PREVIEW_CHARS),
                status: clip.status,
                error: clip.error.clone(),
            },
        });

        self.clips.record(clip);
    }
}

#[async_trait]
impl BatchSynthesizerApi for BatchClipSynthesizer {
    async fn synthesize(
        &self,
        transcript: &Transcript,
        speakers: &SpeakerProfile,
        params: &SynthesisParameters,
        clips_dir: &Path,
        progress: &mut ProgressChannel<'_>,
    ) -> Result<BatchOutcome, PipelineError> {
        if transcript.is_empty() {
            return Err(PipelineError::Validation(
                "transcript has no dialogue lines".to_string(),
            ));
        }
        transcript.validate_speakers(speakers)?;

        tokio::fs::create_dir_all(clips_dir)
            .await
            .map_err(|e| PipelineError::io_write(clips_dir, e))?;

        let start_time = Instant::now();
        let total = transcript.len();
        tracing::info!(
            total_lines = total,
            max_concurrent = self.config.max_concurrent,
            timeout_secs = self.config.request_timeout.as_secs(),
            retry_attempts = self.config.retry_attempts,
            "Starting batch clip synthesis"
        );

        let mut collector = BatchCollector {
            clips: ClipSet::pending(transcript),
            completed: 0,
            total,
        };

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        // Capacity covers every line, so workers never block on send.
        let (tx, mut rx) = mpsc::channel::<Clip>(total);
        let mut workers = JoinSet::new();

        for (index, dialogue) in transcript.dialogues.iter().enumerate() {
            let job = match self.plan_line(index, dialogue, speakers, params, clips_dir) {
                Ok(job) => job,
                Err(rejected) => {
                    collector.record(rejected, progress);
                    continue;
                }
            };

            // Wait for a free worker, recording completions in the meantime.
            let permit = loop {
                tokio::select! {
                    acquired = Arc::clone(&semaphore).acquire_owned() => break acquired,
                    Some(clip) = rx.recv() => collector.record(clip, progress),
                }
            }
            .map_err(|e| PipelineError::Internal(format!("worker pool closed: {}", e)))?;

            tracing::debug!(
                dialogue_index = index,
                speaker = %job.clip.speaker,
                "Dispatching line"
            );

            let repo = Arc::clone(&self.tts_repo);
            let config = self.config.clone();
            let tx = tx.clone();
            workers.spawn(async move {
                let _permit = permit; // held until this line completes
                let clip = run_line(repo.as_ref(), job, &config).await;
                let _ = tx.send(clip).await;
            });
        }

        // All lines dispatched; the channel closes once every worker is done.
        drop(tx);
        while let Some(clip) = rx.recv().await {
            collector.record(clip, progress);
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Synthesis worker terminated abnormally");
            }
        }

        let stragglers: Vec<Clip> = collector
            .clips
            .unresolved()
            .cloned()
            .map(|clip| clip.failed("synthesis worker terminated before completion", 0))
            .collect();
        for clip in stragglers {
            collector.record(clip, progress);
        }

        let clips = collector.clips;
        let success_count = clips.success_count();
        let error_count = clips.error_count();

        tracing::info!(
            total_lines = total,
            success_count,
            error_count,
            latency_ms = start_time.elapsed().as_millis(),
            "Batch clip synthesis completed"
        );

        Ok(BatchOutcome {
            clips,
            success_count,
            error_count,
        })
    }
}

impl BatchClipSynthesizer {
    /// Resolve speaker, parameters, language and destination for one line.
    /// Lines that cannot be sent come back as failed clips.
    fn plan_line(
        &self,
        index: usize,
        dialogue: &Dialogue,
        speakers: &SpeakerProfile,
        params: &SynthesisParameters,
        clips_dir: &Path,
    ) -> Result<LineJob, Clip> {
        let mut clip = Clip::pending(index, dialogue);

        let speaker = match speakers.resolve(&dialogue.speaker) {
            Ok(speaker) => speaker,
            Err(e) => return Err(clip.failed(e.to_string(), 0)),
        };
        clip.speaker = speaker.name.clone();

        let text = clean_line(&dialogue.text);
        if text.is_empty() {
            let error = SynthesisError::Invalid("line is empty after cleanup".to_string());
            return Err(clip.failed(error.to_string(), 0));
        }

        let mut line_params = params.merged(&speaker.overrides);
        let language = self.language_resolver.resolve(
            dialogue.language.as_deref(),
            &line_params.language,
            &text,
        );
        line_params.language = language.as_str().to_string();

        Ok(LineJob {
            path: clips_dir.join(clip_file_name(index, &speaker.name)),
            voice: speaker.voice(),
            params: line_params,
            text,
            clip,
        })
    }
}

/// Synthesize and store one line, retrying up to `retry_attempts` times
async fn run_line(repo: &dyn TtsRepository, job: LineJob, config: &BatchConfig) -> Clip {
    let LineJob {
        clip,
        text,
        voice,
        params,
        path,
    } = job;

    let max_attempts = config.retry_attempts + 1;
    let mut attempts = 0;
    let mut last_error = SynthesisError::failed("not attempted");

    while attempts < max_attempts {
        attempts += 1;
        let started = Instant::now();

        let result = match tokio::time::timeout(
            config.request_timeout,
            repo.synthesize_line(&text, &voice, &params),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(SynthesisError::Timeout(config.request_timeout)),
        };

        match result {
            Ok(audio) if audio.is_empty() => {
                last_error = SynthesisError::failed("service returned no audio");
            }
            Ok(audio) => {
                return match write_atomic(&path, &audio).await {
                    Ok(()) => {
                        tracing::debug!(
                            dialogue_index = clip.dialogue_index,
                            path = %path.display(),
                            audio_size_bytes = audio.len(),
                            latency_ms = started.elapsed().as_millis(),
                            "Clip written"
                        );
                        clip.succeeded(path, attempts)
                    }
                    Err(e) => {
                        let error = SynthesisError::Storage(format!("{}: {}", path.display(), e));
                        clip.failed(error.to_string(), attempts)
                    }
                };
            }
            Err(e) => {
                tracing::warn!(
                    dialogue_index = clip.dialogue_index,
                    voice_id = %voice.voice_id,
                    attempt = attempts,
                    max_attempts,
                    error = %e,
                    "Synthesis attempt failed"
                );
                let retryable = !matches!(e, SynthesisError::Invalid(_));
                last_error = e;
                if !retryable {
                    break;
                }
            }
        }
    }

    clip.failed(last_error.to_string(), attempts)
}
