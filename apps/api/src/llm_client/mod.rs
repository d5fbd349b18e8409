/// LLM Client — the single point of entry for all hosted-model calls in Pathway.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Structured generation depends on the `LanguageModel` trait, which this client implements.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in Pathway.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
/// Moderate sampling: analyses should vary between runs but still follow the schema.
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that turns a (system, user) prompt pair into free-form text.
///
/// Conformance to a response schema is the caller's job; see `generation::structured`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by the generation layer.
/// Wraps the Anthropic Messages API with retry on 429 / 5xx responses.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    /// Extra attempts after the first one.
    max_retries: u32,
    backoff_unit: Duration,
}

impl LlmClient {
    pub fn new(api_key: String, max_retries: u32) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            api_key,
            endpoint: ANTHROPIC_API_URL.to_string(),
            max_retries,
            backoff_unit: Duration::from_secs(1),
        })
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    /// Transport failures and schema-level failures are never retried here.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = build_request(prompt, system);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = backoff_delay(self.backoff_unit, attempt);
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await?;

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = provider_message(response.text().await.unwrap_or_default());
                warn!("LLM API returned {}: {}", status, message);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: provider_message(body),
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: self.max_retries,
        }))
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

fn build_request<'a>(prompt: &'a str, system: &'a str) -> AnthropicRequest<'a> {
    AnthropicRequest {
        model: MODEL,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        system,
        messages: vec![AnthropicMessage {
            role: "user",
            content: prompt,
        }],
    }
}

fn backoff_delay(unit: Duration, attempt: u32) -> Duration {
    unit * (1u32 << attempt.saturating_sub(1).min(6))
}

/// Pulls `error.message` out of an Anthropic error body, falling back to the raw body.
fn provider_message(body: String) -> String {
    serde_json::from_str::<AnthropicError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{http::StatusCode, routing::post, Router};

    use super::*;

    const OVERLOADED: &str =
        r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;

    fn client_for(endpoint: String, max_retries: u32, backoff_unit: Duration) -> LlmClient {
        LlmClient {
            client: Client::new(),
            api_key: "sk-test".to_string(),
            endpoint,
            max_retries,
            backoff_unit,
        }
    }

    /// Local stand-in for the Messages endpoint that always answers `status`/`body`.
    async fn serve(status: StatusCode, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/v1/messages",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (status, body)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1/messages"), hits)
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_max_retries_times() {
        let (endpoint, hits) = serve(StatusCode::SERVICE_UNAVAILABLE, OVERLOADED).await;
        let client = client_for(endpoint, 2, Duration::from_millis(1));

        let err = client.complete("system", "prompt").await.unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"bad key"}}"#;
        let (endpoint, hits) = serve(StatusCode::UNAUTHORIZED, body).await;
        let client = client_for(endpoint, 3, Duration::from_millis(1));

        let err = client.complete("system", "prompt").await.unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(matches!(err, LlmError::Api { status: 401, ref message } if message == "bad key"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_not_retried() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(
            format!("http://{addr}/v1/messages"),
            3,
            Duration::from_secs(10),
        );

        let started = std::time::Instant::now();
        let err = client.complete("system", "prompt").await.unwrap_err();

        assert!(matches!(err, LlmError::Http(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_successful_call_returns_text() {
        let body = r#"{"content":[{"type":"text","text":"{\"path\": []}"}],"usage":{"input_tokens":3,"output_tokens":2}}"#;
        let (endpoint, hits) = serve(StatusCode::OK, body).await;
        let client = client_for(endpoint, 0, Duration::from_millis(1));

        let text = client.complete("system", "prompt").await.unwrap();

        assert_eq!(text, "{\"path\": []}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_request_carries_fixed_temperature_and_model() {
        let request = build_request("Analyze the career domain: 'Robotics'.", "system");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], MODEL);
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["system"], "system");
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let unit = Duration::from_secs(1);
        assert_eq!(backoff_delay(unit, 1).as_millis(), 1000);
        assert_eq!(backoff_delay(unit, 2).as_millis(), 2000);
        assert_eq!(backoff_delay(unit, 3).as_millis(), 4000);
    }

    #[test]
    fn test_provider_message_extracts_error_body() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"bad key"}}"#;
        assert_eq!(provider_message(body.to_string()), "bad key");
        assert_eq!(provider_message("plain".to_string()), "plain");
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let json = r#"{
            "content": [
                {"type": "tool_use", "text": null},
                {"type": "text", "text": "{\"path\": []}"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("{\"path\": []}"));
    }
}
