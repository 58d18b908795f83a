//! Answer generation grounded in retrieved context.
//!
//! [`AnswerGenerator`] routes each request to exactly one of two
//! modes: a flat text prompt, or a structured multi-part message when
//! an image accompanies the question. [`OpenAiGenerator`] implements
//! both against the OpenAI REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::error::{RagError, Result};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// Model for text-only answers.
const TEXT_MODEL: &str = "gpt-4o-mini";
/// Model for image-grounded answers.
const MULTIMODAL_MODEL: &str = "gpt-4.1-mini";

/// Low temperature favors deterministic, grounded answers.
const TEMPERATURE: f32 = 0.2;
/// Output bound for text answers.
const MAX_TOKENS: u32 = 512;
/// Output bound for multimodal answers.
const MAX_OUTPUT_TOKENS: u32 = 500;

/// Timeout for completion requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You are a helpful educational tutor.";

/// Produces a natural-language answer from retrieved context and a
/// question, optionally grounded in an image.
///
/// The provided [`answer`](AnswerGenerator::answer) method selects the
/// mode by image presence; the two modes are mutually exclusive per
/// request. An empty context is legitimate — implementations must
/// still produce an answer rather than failing.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Answer from a flat text prompt embedding context and question.
    async fn answer_text(&self, context: &str, question: &str) -> Result<String>;

    /// Answer from a structured text + image message.
    async fn answer_multimodal(
        &self,
        context: &str,
        question: &str,
        image_base64: &str,
    ) -> Result<String>;

    /// Route to the multimodal mode when an image is present,
    /// otherwise to the text mode.
    async fn answer(
        &self,
        context: &str,
        question: &str,
        image_base64: Option<&str>,
    ) -> Result<String> {
        match image_base64 {
            Some(image) => self.answer_multimodal(context, question, image).await,
            None => self.answer_text(context, question).await,
        }
    }
}

/// Build the flat prompt for text-only answers.
fn build_text_prompt(context: &str, question: &str) -> String {
    format!("CONTEXT:\n{context}\n\nQUERY: {question}")
}

/// Build the text part of the multimodal message.
fn build_multimodal_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a helpful educational assistant.\n\n\
         Use the following retrieved context to answer the question.\n\n\
         Context:\n{context}\n\nQuestion:\n{question}"
    )
}

/// An [`AnswerGenerator`] backed by the OpenAI completion APIs.
///
/// Text mode calls `/v1/chat/completions` with fixed low-temperature
/// sampling; multimodal mode calls `/v1/responses` with an
/// `input_text` + `input_image` message. Failures propagate as
/// [`RagError::GenerationFailed`] with the provider error attached;
/// there is no automatic retry.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiGenerator {
    /// Create a new generator with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::GenerationFailed {
                provider: "OpenAI".into(),
                message: "API key must not be empty".into(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RagError::GenerationFailed {
                provider: "OpenAI".into(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, api_key })
    }

    async fn post_json(&self, url: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "completion request failed");
                RagError::GenerationFailed {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(provider = "OpenAI", %status, "completion API error");
            return Err(RagError::GenerationFailed {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        response.json().await.map_err(|e| RagError::GenerationFailed {
            provider: "OpenAI".into(),
            message: format!("failed to parse response: {e}"),
        })
    }
}

// ── Chat completions response types ────────────────────────────────

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

// ── Responses API types ────────────────────────────────────────────

#[derive(Deserialize)]
struct ResponsesResponse {
    output: Vec<ResponsesOutput>,
}

#[derive(Deserialize)]
struct ResponsesOutput {
    #[serde(default)]
    content: Vec<ResponsesContent>,
}

#[derive(Deserialize)]
struct ResponsesContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl AnswerGenerator for OpenAiGenerator {
    async fn answer_text(&self, context: &str, question: &str) -> Result<String> {
        debug!(model = TEXT_MODEL, context_len = context.len(), "generating text answer");

        let body = json!({
            "model": TEXT_MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_text_prompt(context, question) },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let raw = self.post_json(CHAT_COMPLETIONS_URL, body).await?;
        let parsed: ChatResponse =
            serde_json::from_value(raw).map_err(|e| RagError::GenerationFailed {
                provider: "OpenAI".into(),
                message: format!("unexpected chat response shape: {e}"),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| RagError::GenerationFailed {
                provider: "OpenAI".into(),
                message: "API returned no choices".into(),
            })
    }

    async fn answer_multimodal(
        &self,
        context: &str,
        question: &str,
        image_base64: &str,
    ) -> Result<String> {
        debug!(model = MULTIMODAL_MODEL, context_len = context.len(), "generating multimodal answer");

        let body = json!({
            "model": MULTIMODAL_MODEL,
            "input": [{
                "role": "user",
                "content": [
                    { "type": "input_text", "text": build_multimodal_prompt(context, question) },
                    { "type": "input_image", "image_url": format!("data:image/png;base64,{image_base64}") },
                ],
            }],
            "max_output_tokens": MAX_OUTPUT_TOKENS,
        });

        let raw = self.post_json(RESPONSES_URL, body).await?;
        let parsed: ResponsesResponse =
            serde_json::from_value(raw).map_err(|e| RagError::GenerationFailed {
                provider: "OpenAI".into(),
                message: format!("unexpected responses shape: {e}"),
            })?;

        let answer: String = parsed
            .output
            .iter()
            .flat_map(|o| o.content.iter())
            .filter(|c| c.kind == "output_text")
            .map(|c| c.text.as_str())
            .collect();

        if answer.is_empty() {
            return Err(RagError::GenerationFailed {
                provider: "OpenAI".into(),
                message: "API returned no output text".into(),
            });
        }

        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records which mode each request was routed to.
    #[derive(Default)]
    struct RecordingGenerator {
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl AnswerGenerator for RecordingGenerator {
        async fn answer_text(&self, _context: &str, _question: &str) -> Result<String> {
            self.calls.lock().unwrap().push("text");
            Ok("text answer".to_string())
        }

        async fn answer_multimodal(
            &self,
            _context: &str,
            _question: &str,
            _image_base64: &str,
        ) -> Result<String> {
            self.calls.lock().unwrap().push("multimodal");
            Ok("multimodal answer".to_string())
        }
    }

    #[tokio::test]
    async fn image_routes_to_multimodal_only() {
        let generator = RecordingGenerator::default();
        let answer = generator.answer("ctx", "q", Some("aGVsbG8=")).await.unwrap();
        assert_eq!(answer, "multimodal answer");
        assert_eq!(*generator.calls.lock().unwrap(), vec!["multimodal"]);
    }

    #[tokio::test]
    async fn no_image_routes_to_text_only() {
        let generator = RecordingGenerator::default();
        let answer = generator.answer("ctx", "q", None).await.unwrap();
        assert_eq!(answer, "text answer");
        assert_eq!(*generator.calls.lock().unwrap(), vec!["text"]);
    }

    #[tokio::test]
    async fn empty_context_still_produces_an_answer() {
        let generator = RecordingGenerator::default();
        let answer = generator.answer("", "what is chapter 3 about?", None).await.unwrap();
        assert!(!answer.is_empty());
    }

    #[test]
    fn text_prompt_embeds_context_and_question() {
        let prompt = build_text_prompt("some context", "some question");
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("some question"));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            OpenAiGenerator::new(""),
            Err(RagError::GenerationFailed { .. })
        ));
    }
}
