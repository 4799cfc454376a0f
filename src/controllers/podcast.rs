use crate::{
    domain::{
        audio::{AudioCombiner, CombineOptions, CombinedAudio},
        content::ContentInput,
        pipeline::{PipelineOrchestratorApi, RunArtifacts, RunFailure, RunRequest},
        progress::ProgressObserver,
        speaker::{Speaker, SpeakerProfile},
        synthesis::{QualityPreset, SynthesisParameters},
    },
    error::{AppError, AppResult},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Brief file accepted by `generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastBrief {
    pub content_input: ContentInput,
    pub voice_selections: Vec<Speaker>,
    #[serde(default)]
    pub synthesis_parameters: SynthesisParameters,
    #[serde(default)]
    pub quality_preset: Option<String>,
}

impl PodcastBrief {
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Validation(format!("cannot read brief {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Validation(format!("invalid brief {}: {}", path.display(), e))
        })
    }

    /// Turn the brief into a run request; `quality_override` wins over the brief's preset
    pub fn into_request(self, quality_override: Option<&str>) -> AppResult<RunRequest> {
        let quality_preset = match quality_override.or(self.quality_preset.as_deref()) {
            Some(name) => name.parse::<QualityPreset>().map_err(AppError::Validation)?,
            None => QualityPreset::default(),
        };
        let speaker_profile = SpeakerProfile::new(self.voice_selections)?;

        Ok(RunRequest {
            content_input: self.content_input,
            speaker_profile,
            synthesis_parameters: self.synthesis_parameters,
            quality_preset,
        })
    }
}

pub struct PodcastController {
    orchestrator: Arc<dyn PipelineOrchestratorApi>,
}

impl PodcastController {
    pub fn new(orchestrator: Arc<dyn PipelineOrchestratorApi>) -> Self {
        Self { orchestrator }
    }

    /// `generate` - run the full pipeline from a brief file
    pub async fn generate(
        &self,
        brief_path: &Path,
        quality_override: Option<&str>,
        observer: &dyn ProgressObserver,
    ) -> AppResult<RunArtifacts> {
        let request = PodcastBrief::from_file(brief_path)?.into_request(quality_override)?;

        tracing::info!(
            brief = %brief_path.display(),
            topic = %request.content_input.topic,
            speakers = ?request.speaker_profile.names().collect::<Vec<_>>(),
            quality_preset = %request.quality_preset,
            "Generating podcast"
        );

        self.orchestrator
            .run(request, observer)
            .await
            .map_err(report_failure)
    }

    /// `combine` - assemble an existing clip directory into one file
    pub fn combine(
        clips_dir: &Path,
        output: &Path,
        silence: Option<Duration>,
    ) -> AppResult<CombinedAudio> {
        let mut options = CombineOptions::default();
        if let Some(silence) = silence {
            options.inter_clip_silence = silence;
        }
        let combined = AudioCombiner::new(options).combine_directory(clips_dir, output)?;
        Ok(combined)
    }
}

fn report_failure(failure: RunFailure) -> AppError {
    tracing::error!(
        stage = ?failure.failed_stage,
        error = %failure.error,
        events = failure.history.len(),
        outline = ?failure.partial.outline_path,
        transcript = ?failure.partial.transcript_path,
        clips = failure.partial.clip_paths.len(),
        "Podcast run failed"
    );
    if !failure.partial.is_empty() {
        if let Some(dir) = &failure.partial.run_dir {
            eprintln!("Partial artifacts kept in {}", dir.display());
        }
    }
    failure.error.into()
}
