//! OpenAiTranscriptClassifier -- chat-completions-backed transcript
//! psychology classification.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use memoir_core::classify::TranscriptClassifier;
use memoir_types::call::ClassifiedSnippet;
use memoir_types::error::ClassificationError;

use super::types::{ChatMessage, ChatRequest, ChatResponse};
use super::DEFAULT_BASE_URL;

const DEFAULT_MODEL: &str = "gpt-4o";
const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 2000;

/// OpenAI chat-completions classifier.
///
/// Sends the full rendered transcript plus an optional summary and asks the
/// model to return a JSON array of categorized snippets. A low temperature
/// keeps the extraction close to the user's literal words.
pub struct OpenAiTranscriptClassifier {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiTranscriptClassifier {
    pub fn new(api_key: SecretString) -> Result<Self, ClassificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| {
                ClassificationError::Request(format!("failed to build http client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

fn build_prompt(transcript: &str, summary: Option<&str>) -> String {
    let summary_section = summary
        .map(|s| format!("\n\nSUMMARY:\n{s}"))
        .unwrap_or_default();

    format!(
        r#"Analyze this accountability call transcript for psychological patterns.

CONVERSATION:
{transcript}{summary_section}

Extract and categorize the following from the user's statements:

1. EXCUSES: Rationalizations or justifications for not following through
2. BREAKTHROUGHS: Moments of insight, self-awareness, or commitment to change
3. COMMITMENTS: Specific promises or goals the user states
4. TRIGGERS: Emotional triggers or situations that derail the user
5. PATTERNS: Recurring behavioral or linguistic patterns
6. EMOTIONS: Notable emotional states expressed by the user

Return ONLY a JSON array with this format: [{{"type": "excuse", "content": "exact text", "confidence": 0.8}}]

Focus on extracting the user's actual words and statements, not the AI assistant's responses."#
    )
}

/// Parse the model's response content into snippets.
///
/// The model occasionally wraps the array in a markdown code fence; strip
/// that before parsing.
fn parse_snippets(content: &str) -> Result<Vec<ClassifiedSnippet>, ClassificationError> {
    let trimmed = content.trim();
    let stripped = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(stripped)
        .map_err(|e| ClassificationError::MalformedResponse(format!("invalid snippet json: {e}")))
}

impl TranscriptClassifier for OpenAiTranscriptClassifier {
    #[tracing::instrument(skip_all, fields(
        gen_ai.operation.name = "chat",
        gen_ai.provider.name = "openai",
        gen_ai.request.model = %self.model,
        transcript_len = transcript.len(),
    ))]
    async fn classify(
        &self,
        transcript: &str,
        summary: Option<&str>,
    ) -> Result<Vec<ClassifiedSnippet>, ClassificationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(transcript, summary),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassificationError::Request(format!("http request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Api {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassificationError::MalformedResponse(format!("invalid json: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ClassificationError::MalformedResponse("response had no content".to_string())
            })?;

        parse_snippets(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_transcript_and_summary() {
        let prompt = build_prompt("agent: hello\nuser: I was too busy", Some("short call"));
        assert!(prompt.contains("CONVERSATION:\nagent: hello\nuser: I was too busy"));
        assert!(prompt.contains("SUMMARY:\nshort call"));
        assert!(prompt.contains("Return ONLY a JSON array"));
    }

    #[test]
    fn test_prompt_omits_summary_section_when_absent() {
        let prompt = build_prompt("user: hi", None);
        assert!(!prompt.contains("SUMMARY:"));
    }

    #[test]
    fn test_parse_plain_array() {
        let snippets = parse_snippets(
            r#"[{"type": "excuse", "content": "I was too busy", "confidence": 0.8}]"#,
        )
        .unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].kind, "excuse");
        assert_eq!(snippets[0].content, "I was too busy");
        assert!((snippets[0].confidence - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_fenced_array() {
        let snippets = parse_snippets(
            "```json\n[{\"type\": \"breakthrough\", \"content\": \"I see it now\", \"confidence\": 0.9}]\n```",
        )
        .unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].kind, "breakthrough");
    }

    #[test]
    fn test_parse_rejects_prose() {
        let result = parse_snippets("Sure! Here are the patterns I found.");
        assert!(matches!(
            result,
            Err(ClassificationError::MalformedResponse(_))
        ));
    }
}
