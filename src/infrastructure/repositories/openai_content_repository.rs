use super::content_repository::ContentRepository;
use crate::domain::content::{
    ContentInput, Dialogue, GenerationError, Outline, OutlineSegment, Transcript,
};
use crate::domain::speaker::SpeakerProfile;
use anyhow::Context;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const OUTLINE_SYSTEM_PROMPT: &str = "You plan podcast episodes. Reply with a JSON object of the form \
{\"segments\": [{\"title\": string, \"description\": string, \"key_points\": [string]}]} and nothing else.";

const TRANSCRIPT_SYSTEM_PROMPT: &str = "You write natural podcast dialogue. Reply with a JSON object of the form \
{\"dialogues\": [{\"speaker\": string, \"text\": string}]} and nothing else. \
Use only the exact speaker names you are given. Each text is one spoken turn without stage directions.";

#[derive(Debug, Deserialize)]
struct OutlineResponse {
    #[serde(alias = "outline")]
    segments: Vec<OutlineSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(alias = "lines", alias = "transcript")]
    dialogues: Vec<Dialogue>,
}

/// Content service backed by OpenAI chat completions
pub struct OpenAiContentRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiContentRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    async fn complete_json(&self, system: &str, user: String) -> Result<String, GenerationError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .response_format(ResponseFormat::JsonObject)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .context("building system message")?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()
                    .context("building user message")?
                    .into(),
            ])
            .build()
            .context("building chat completion request")?;

        let start_time = std::time::Instant::now();
        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "OpenAI chat completion failed");
            GenerationError::Dependency(format!("OpenAI chat error: {}", e))
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::Malformed("completion has no content".to_string()))?;

        tracing::info!(
            provider = "openai",
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            response_length = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }
}

fn outline_prompt(input: &ContentInput) -> String {
    let mut prompt = format!(
        "Topic: {}\nLanguage: {}\nNumber of segments: {}\n",
        input.topic, input.language, input.num_segments
    );
    if !input.key_points.is_empty() {
        prompt.push_str("Key points to cover:\n");
        for point in &input.key_points {
            prompt.push_str(&format!("- {}\n", point));
        }
    }
    if !input.briefing.trim().is_empty() {
        prompt.push_str(&format!("Briefing:\n{}\n", input.briefing.trim()));
    }
    prompt
}

fn transcript_prompt(outline: &Outline, speakers: &SpeakerProfile, input: &ContentInput) -> String {
    let mut prompt = format!(
        "Write the episode in {} about: {}\n\nSpeakers:\n",
        input.language, input.topic
    );
    for speaker in speakers.speakers() {
        prompt.push_str(&format!("- {} ({})\n", speaker.name, speaker.role));
    }
    prompt.push_str("\nOutline:\n");
    for (index, segment) in outline.segments.iter().enumerate() {
        prompt.push_str(&format!("{}. {}", index + 1, segment.title));
        if !segment.description.is_empty() {
            prompt.push_str(&format!(": {}", segment.description));
        }
        prompt.push('\n');
        for point in &segment.key_points {
            prompt.push_str(&format!("   - {}\n", point));
        }
    }
    if !input.briefing.trim().is_empty() {
        prompt.push_str(&format!("\nBriefing:\n{}\n", input.briefing.trim()));
    }
    prompt
}

/// Body of a model reply with any surrounding code fence removed
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn parse_outline(raw: &str) -> Result<Outline, GenerationError> {
    let parsed: OutlineResponse = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| GenerationError::Malformed(format!("outline: {}", e)))?;
    Ok(Outline {
        segments: parsed.segments,
    })
}

fn parse_transcript(raw: &str) -> Result<Transcript, GenerationError> {
    let parsed: TranscriptResponse = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| GenerationError::Malformed(format!("transcript: {}", e)))?;
    let dialogues = parsed
        .dialogues
        .into_iter()
        .filter(|d| !d.text.trim().is_empty())
        .map(|mut d| {
            d.speaker = d.speaker.trim().to_string();
            d
        })
        .collect();
    Ok(Transcript::new(dialogues))
}

#[async_trait]
impl ContentRepository for OpenAiContentRepository {
    async fn generate_outline(&self, input: &ContentInput) -> Result<Outline, GenerationError> {
        tracing::info!(
            topic = %input.topic,
            num_segments = input.num_segments,
            "Generating outline"
        );
        let raw = self
            .complete_json(OUTLINE_SYSTEM_PROMPT, outline_prompt(input))
            .await?;
        parse_outline(&raw)
    }

    async fn generate_transcript(
        &self,
        outline: &Outline,
        speakers: &SpeakerProfile,
        input: &ContentInput,
    ) -> Result<Transcript, GenerationError> {
        tracing::info!(
            segment_count = outline.segment_count(),
            speaker_count = speakers.len(),
            "Generating transcript"
        );
        let raw = self
            .complete_json(TRANSCRIPT_SYSTEM_PROMPT, transcript_prompt(outline, speakers, input))
            .await?;
        parse_transcript(&raw)
    }
}
