use crate::e2e::helpers;

use helpers::assertions::{assert_monotonic_progress, lifecycle, read_samples, runs};
use helpers::fixtures::{aba_transcript, outline, run_request, LINE_ONE, LINE_THREE, LINE_TWO};
use helpers::mocks::{tone_for, MockContentRepository, MockTtsRepository, MOCK_CLIP_SAMPLES};
use helpers::{RecordingObserver, TestContext, TEST_SILENCE_FRAMES};
use podcast_studio::domain::content::{Dialogue, Transcript};
use podcast_studio::domain::pipeline::{PipelineError, PipelineOrchestratorApi};
use podcast_studio::domain::progress::{EventStatus, ProgressEvent, Stage, StageSummary};
use podcast_studio::domain::speaker::{Speaker, SpeakerProfile};
use podcast_studio::domain::synthesis::{
    BatchConfig, ClipSet, ClipStatus, QualityPreset, SynthesisOverrides,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn it_should_skip_a_failed_line_and_keep_transcript_order() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(2), aba_transcript()),
        MockTtsRepository::new()
            .failing_on(LINE_TWO)
            // Line one finishes last.
            .with_delay(LINE_ONE, 60),
    );
    let observer = RecordingObserver::default();

    let artifacts = ctx.orchestrator.run(run_request(2), &observer).await.unwrap();

    // Clip set: [success@0, error@1, success@2]
    let statuses: Vec<ClipStatus> = artifacts.clips.clips().iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![ClipStatus::Success, ClipStatus::Error, ClipStatus::Success]
    );
    assert!(artifacts.clips.get(1).unwrap().error.as_deref().unwrap().contains("rejected"));
    assert_eq!(artifacts.clip_paths.len(), 2);

    // Combined audio holds lines 0 and 2 only, in that order, separated by silence
    assert_eq!(artifacts.combined.source_clip_count, 2);
    let samples = read_samples(&artifacts.combined_audio_path);
    assert_eq!(
        runs(&samples),
        vec![
            (tone_for(LINE_ONE), MOCK_CLIP_SAMPLES),
            (0, TEST_SILENCE_FRAMES),
            (tone_for(LINE_THREE), MOCK_CLIP_SAMPLES),
        ]
    );

    // Every artifact is on disk
    assert!(artifacts.outline_path.is_file());
    assert!(artifacts.transcript_path.is_file());
    assert!(artifacts.clip_manifest_path.is_file());
    assert!(artifacts.clip_paths.iter().all(|p| p.is_file()));
    let manifest: ClipSet =
        serde_json::from_slice(&std::fs::read(&artifacts.clip_manifest_path).unwrap()).unwrap();
    assert_eq!(manifest, artifacts.clips);

    // Stages ran strictly in order
    assert_eq!(
        lifecycle(&artifacts.history),
        vec![
            (Stage::GenerateOutline, EventStatus::Started),
            (Stage::GenerateOutline, EventStatus::Completed),
            (Stage::GenerateTranscript, EventStatus::Started),
            (Stage::GenerateTranscript, EventStatus::Completed),
            (Stage::GenerateClips, EventStatus::Started),
            (Stage::GenerateClips, EventStatus::Completed),
            (Stage::CombineAudio, EventStatus::Started),
            (Stage::CombineAudio, EventStatus::Completed),
        ]
    );
    assert_monotonic_progress(&artifacts.history, 3);

    // The observer saw exactly what the history records
    assert_eq!(*observer.events.lock().unwrap(), artifacts.history);
}

#[tokio::test]
async fn it_should_report_clip_counts_in_stage_summary() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(1), aba_transcript()),
        MockTtsRepository::new().failing_on(LINE_THREE),
    );

    let artifacts = ctx
        .orchestrator
        .run(run_request(1), &RecordingObserver::default())
        .await
        .unwrap();

    let summary = artifacts.history.iter().find_map(|e| match e {
        ProgressEvent::StageCompleted {
            stage: Stage::GenerateClips,
            summary,
        } => Some(summary.clone()),
        _ => None,
    });
    assert_eq!(
        summary,
        Some(StageSummary::Clips {
            clip_count: 3,
            success_count: 2,
            error_count: 1,
        })
    );
}

#[tokio::test]
async fn it_should_abort_when_outline_generation_fails() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(2), aba_transcript()).failing_outline("quota exceeded"),
        MockTtsRepository::new(),
    );

    let failure = ctx
        .orchestrator
        .run(run_request(2), &RecordingObserver::default())
        .await
        .unwrap_err();

    assert_eq!(failure.failed_stage, Some(Stage::GenerateOutline));
    assert!(matches!(failure.error, PipelineError::Generation(_)));
    assert!(failure.error.to_string().contains("quota exceeded"));
    assert!(failure.partial.is_empty());
    assert_eq!(
        lifecycle(&failure.history),
        vec![
            (Stage::GenerateOutline, EventStatus::Started),
            (Stage::GenerateOutline, EventStatus::Failed),
        ]
    );
    assert_eq!(ctx.content.calls(), (1, 0));
    assert_eq!(ctx.tts.call_count(), 0);
}

#[tokio::test]
async fn it_should_abort_when_transcript_generation_fails() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(2), aba_transcript()).failing_transcript("timeout"),
        MockTtsRepository::new(),
    );

    let failure = ctx
        .orchestrator
        .run(run_request(2), &RecordingObserver::default())
        .await
        .unwrap_err();

    assert_eq!(failure.failed_stage, Some(Stage::GenerateTranscript));
    assert!(failure.partial.outline_path.as_ref().unwrap().is_file());
    assert!(failure.partial.transcript_path.is_none());
    assert_eq!(ctx.tts.call_count(), 0);
}

#[tokio::test]
async fn it_should_abort_on_unknown_transcript_speaker() {
    let transcript = Transcript::new(vec![
        Dialogue::new("A", LINE_ONE),
        Dialogue::new("Narrator", LINE_TWO),
    ]);
    let ctx = TestContext::new(
        MockContentRepository::new(outline(1), transcript),
        MockTtsRepository::new(),
    );

    let failure = ctx
        .orchestrator
        .run(run_request(1), &RecordingObserver::default())
        .await
        .unwrap_err();

    assert_eq!(failure.failed_stage, Some(Stage::GenerateTranscript));
    assert!(failure.error.to_string().contains("Narrator"));
    assert_eq!(ctx.tts.call_count(), 0);
}

#[tokio::test]
async fn it_should_abort_on_empty_transcript_before_synthesis() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(1), Transcript::default()),
        MockTtsRepository::new(),
    );

    let failure = ctx
        .orchestrator
        .run(run_request(1), &RecordingObserver::default())
        .await
        .unwrap_err();

    assert_eq!(failure.failed_stage, Some(Stage::GenerateTranscript));
    assert_eq!(ctx.tts.call_count(), 0);
}

#[tokio::test]
async fn it_should_fail_combine_when_every_clip_fails() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(1), aba_transcript()),
        MockTtsRepository::new()
            .failing_on(LINE_ONE)
            .failing_on(LINE_TWO)
            .failing_on(LINE_THREE),
    );

    let failure = ctx
        .orchestrator
        .run(run_request(1), &RecordingObserver::default())
        .await
        .unwrap_err();

    assert_eq!(failure.failed_stage, Some(Stage::CombineAudio));
    assert!(matches!(failure.error, PipelineError::EmptyInput));

    // Earlier artifacts remain valid and are reported
    assert!(failure.partial.outline_path.as_ref().unwrap().is_file());
    assert!(failure.partial.transcript_path.as_ref().unwrap().is_file());
    assert!(failure.partial.clip_manifest_path.as_ref().unwrap().is_file());
    assert!(failure.partial.clip_paths.is_empty());

    let run_dir = failure.partial.run_dir.as_ref().unwrap();
    assert!(!run_dir.join("podcast.wav").exists());
    assert_eq!(
        lifecycle(&failure.history).last(),
        Some(&(Stage::CombineAudio, EventStatus::Failed))
    );
    assert_monotonic_progress(&failure.history, 3);
}

#[tokio::test]
async fn it_should_tolerate_outline_segment_mismatch() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(5), aba_transcript()),
        MockTtsRepository::new(),
    );

    let artifacts = ctx
        .orchestrator
        .run(run_request(2), &RecordingObserver::default())
        .await
        .unwrap();

    assert_eq!(artifacts.outline.segment_count(), 5);
    let summary = artifacts.history.iter().find_map(|e| match e {
        ProgressEvent::StageCompleted {
            summary: StageSummary::Outline {
                segment_count,
                requested_segments,
                ..
            },
            ..
        } => Some((*segment_count, *requested_segments)),
        _ => None,
    });
    assert_eq!(summary, Some((5, 2)));
}

#[tokio::test]
async fn it_should_reject_invalid_request_before_any_call() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(1), aba_transcript()),
        MockTtsRepository::new(),
    );

    let failure = ctx
        .orchestrator
        .run(run_request(0), &RecordingObserver::default())
        .await
        .unwrap_err();

    assert!(matches!(failure.error, PipelineError::Validation(_)));
    assert_eq!(failure.failed_stage, None);
    assert!(failure.history.is_empty());
    assert_eq!(ctx.content.calls(), (0, 0));
    assert!(ctx.run_dirs().is_empty());
}

#[tokio::test]
async fn it_should_reject_speaker_without_voice() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(1), aba_transcript()),
        MockTtsRepository::new(),
    );
    let mut request = run_request(1);
    request.speaker_profile = SpeakerProfile::new(vec![
        Speaker::new("A", "Host", "nova"),
        Speaker::new("B", "Guest", "  "),
    ])
    .unwrap();

    let failure = ctx
        .orchestrator
        .run(request, &RecordingObserver::default())
        .await
        .unwrap_err();

    assert!(matches!(failure.error, PipelineError::Validation(_)));
    assert_eq!(ctx.content.calls(), (0, 0));
}

#[tokio::test]
async fn it_should_layer_quality_preset_under_speaker_overrides() {
    let ctx = TestContext::with_config(
        MockContentRepository::new(outline(1), aba_transcript()),
        MockTtsRepository::new(),
        BatchConfig {
            max_concurrent: 1,
            ..Default::default()
        },
    );
    let mut request = run_request(1);
    request.quality_preset = QualityPreset::High;
    request.speaker_profile = SpeakerProfile::new(vec![
        Speaker::new("A", "Host", "nova"),
        Speaker::new("B", "Guest", "onyx").with_overrides(SynthesisOverrides {
            temperature: Some(0.3),
            ..Default::default()
        }),
    ])
    .unwrap();

    ctx.orchestrator
        .run(request, &RecordingObserver::default())
        .await
        .unwrap();

    let requests = ctx.tts.requests();
    assert_eq!(requests.len(), 3);
    for seen in &requests {
        assert_eq!(seen.params.max_new_tokens, 2048);
        assert_eq!(seen.params.language, "en");
        let expected_temperature = if seen.voice_id == "onyx" { 0.3 } else { 0.8 };
        assert_eq!(seen.params.temperature, expected_temperature, "{}", seen.text);
    }
}

#[tokio::test]
async fn it_should_survive_a_panicking_observer() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(1), aba_transcript()),
        MockTtsRepository::new(),
    );
    let observer = |_: &ProgressEvent| panic!("display crashed");

    let artifacts = ctx.orchestrator.run(run_request(1), &observer).await.unwrap();

    assert_eq!(artifacts.combined.source_clip_count, 3);
    assert_eq!(artifacts.history.len(), 8 + 3);
}

#[tokio::test]
async fn it_should_bound_concurrency_for_long_transcripts() {
    let lines: Vec<Dialogue> = (0..20)
        .map(|i| Dialogue::new(if i % 2 == 0 { "A" } else { "B" }, format!("Line number {}.", i)))
        .collect();
    let ctx = TestContext::with_config(
        MockContentRepository::new(outline(1), Transcript::new(lines)),
        MockTtsRepository::new(),
        BatchConfig {
            max_concurrent: 3,
            ..Default::default()
        },
    );

    let artifacts = ctx
        .orchestrator
        .run(run_request(1), &RecordingObserver::default())
        .await
        .unwrap();

    assert_eq!(artifacts.clips.len(), 20);
    assert_eq!(artifacts.combined.source_clip_count, 20);
    let indices: Vec<usize> = artifacts.clips.clips().iter().map(|c| c.dialogue_index).collect();
    assert_eq!(indices, (0..20).collect::<Vec<_>>());
    assert_monotonic_progress(&artifacts.history, 20);
}
