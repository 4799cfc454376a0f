use crate::e2e::helpers;

use helpers::assertions::{read_samples, runs};
use helpers::fixtures::{aba_transcript, outline, LINE_ONE, LINE_THREE, LINE_TWO};
use helpers::mocks::{
    tone_for, MockContentRepository, MockTtsRepository, MOCK_CLIP_SAMPLES, MOCK_SAMPLE_RATE,
};
use helpers::{RecordingObserver, TestContext, TEST_SILENCE_FRAMES};
use podcast_studio::controllers::podcast::PodcastController;
use podcast_studio::domain::audio::wav::encode_pcm16;
use podcast_studio::domain::pipeline::PipelineOrchestratorApi;
use podcast_studio::error::AppError;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

const BRIEF: &str = r#"{
    "content_input": {
        "topic": "Tide pools of the Atlantic coast",
        "key_points": ["anemones"],
        "num_segments": 2
    },
    "voice_selections": [
        {"name": "A", "role": "Host", "voice_id": "nova"},
        {"name": "B", "role": "Guest", "voice_id": "onyx", "type": "preset"}
    ],
    "quality_preset": "standard"
}"#;

fn write_brief(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("brief.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(BRIEF.as_bytes()).unwrap();
    path
}

fn controller(ctx: TestContext) -> (PodcastController, tempfile::TempDir, Arc<MockTtsRepository>) {
    let TestContext {
        output,
        tts,
        orchestrator,
        ..
    } = ctx;
    (PodcastController::new(Arc::new(orchestrator)), output, tts)
}

#[tokio::test]
async fn it_should_generate_from_brief_file() {
    let (controller, output, tts) = controller(TestContext::new(
        MockContentRepository::new(outline(2), aba_transcript()),
        MockTtsRepository::new(),
    ));
    let brief = write_brief(output.path());

    let artifacts = controller
        .generate(&brief, None, &RecordingObserver::default())
        .await
        .unwrap();

    assert_eq!(artifacts.combined.source_clip_count, 3);
    assert!(artifacts.combined_audio_path.starts_with(output.path()));
    assert!(tts.requests().iter().all(|r| r.params.max_new_tokens == 1536));
}

#[tokio::test]
async fn it_should_exit_as_external_service_when_content_service_is_down() {
    let (controller, output, _tts) = controller(TestContext::new(
        MockContentRepository::new(outline(2), aba_transcript()).failing_outline("service down"),
        MockTtsRepository::new(),
    ));
    let brief = write_brief(output.path());

    let error = controller
        .generate(&brief, None, &RecordingObserver::default())
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::ExternalService(_)));
    assert_eq!(error.exit_code(), 7);
}

#[tokio::test]
async fn it_should_recombine_a_finished_run_directory() {
    let ctx = TestContext::new(
        MockContentRepository::new(outline(1), aba_transcript()),
        MockTtsRepository::new().failing_on(LINE_TWO),
    );
    let artifacts = ctx
        .orchestrator
        .run(helpers::fixtures::run_request(1), &RecordingObserver::default())
        .await
        .unwrap();

    let clips_dir = artifacts.clip_paths[0].parent().unwrap().to_path_buf();
    let output = ctx.output.path().join("recombined.wav");
    let combined =
        PodcastController::combine(&clips_dir, &output, Some(Duration::from_millis(10))).unwrap();

    assert_eq!(combined.source_clip_count, 2);
    assert_eq!(
        read_samples(&output),
        read_samples(&artifacts.combined_audio_path)
    );
}

#[test]
fn it_should_order_clip_directory_numerically() {
    let dir = tempfile::tempdir().unwrap();
    // Lexical order would put clip_10 before clip_9.
    for (index, text) in [(10, LINE_THREE), (9, LINE_TWO), (0, LINE_ONE)] {
        let bytes = encode_pcm16(&[tone_for(text); MOCK_CLIP_SAMPLES], MOCK_SAMPLE_RATE).unwrap();
        std::fs::write(dir.path().join(format!("clip_{}_a.wav", index)), bytes).unwrap();
    }
    let output = dir.path().join("out").join("podcast.wav");

    let combined =
        PodcastController::combine(dir.path(), &output, Some(Duration::from_millis(10))).unwrap();

    assert_eq!(combined.source_clip_count, 3);
    assert_eq!(
        runs(&read_samples(&output)),
        vec![
            (tone_for(LINE_ONE), MOCK_CLIP_SAMPLES),
            (0, TEST_SILENCE_FRAMES),
            (tone_for(LINE_TWO), MOCK_CLIP_SAMPLES),
            (0, TEST_SILENCE_FRAMES),
            (tone_for(LINE_THREE), MOCK_CLIP_SAMPLES),
        ]
    );
}

#[test]
fn it_should_fail_with_empty_input_for_directory_without_clips() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("podcast.wav");

    let error = PodcastController::combine(dir.path(), &output, None).unwrap_err();

    assert!(matches!(error, AppError::EmptyInput(_)));
    assert_eq!(error.exit_code(), 5);
    assert!(!output.exists());
}
