use podcast_studio::domain::content::{ContentInput, Dialogue, Outline, OutlineSegment, Transcript};
use podcast_studio::domain::pipeline::RunRequest;
use podcast_studio::domain::speaker::{Speaker, SpeakerProfile};
use podcast_studio::domain::synthesis::{QualityPreset, SynthesisParameters};

pub const LINE_ONE: &str = "Welcome to the show, everyone.";
pub const LINE_TWO: &str = "Thanks for having me on.";
pub const LINE_THREE: &str = "Let's get straight into it.";

pub fn content_input(num_segments: u32) -> ContentInput {
    ContentInput {
        topic: "Tide pools of the Atlantic coast".to_string(),
        key_points: vec!["anemones".to_string(), "low tide safety".to_string()],
        briefing: "Friendly, curious tone.".to_string(),
        num_segments,
        language: "English".to_string(),
    }
}

pub fn speaker_profile() -> SpeakerProfile {
    SpeakerProfile::new(vec![
        Speaker::new("A", "Host", "nova"),
        Speaker::new("B", "Guest", "onyx"),
    ])
    .unwrap()
}

pub fn outline(segments: usize) -> Outline {
    Outline {
        segments: (0..segments)
            .map(|i| OutlineSegment {
                title: format!("Segment {}", i + 1),
                description: String::new(),
                key_points: vec![],
            })
            .collect(),
    }
}

/// Speakers A, B, A in that order
pub fn aba_transcript() -> Transcript {
    Transcript::new(vec![
        Dialogue::new("A", LINE_ONE),
        Dialogue::new("B", LINE_TWO),
        Dialogue::new("A", LINE_THREE),
    ])
}

pub fn run_request(num_segments: u32) -> RunRequest {
    RunRequest {
        content_input: content_input(num_segments),
        speaker_profile: speaker_profile(),
        synthesis_parameters: SynthesisParameters::default(),
        quality_preset: QualityPreset::Quick,
    }
}
