/// LLM Client — the single point of entry for all Claude API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through `LlmClient`, which owns the retry policy.
/// The wire transport sits behind `LlmTransport` so it can be scripted in tests.
///
/// Model: hardcoded (do not make configurable to prevent drift)
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod json_extract;
pub mod prompts;
#[cfg(test)]
pub mod testing;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for every pipeline step.
pub const MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
/// Lowered temperature for structured (JSON) answers.
pub const JSON_TEMPERATURE: f32 = 0.3;
const MAX_ATTEMPTS: u32 = 3;
const BASE_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured (set ANTHROPIC_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM provider failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<LlmError>,
    },

    #[error("LLM returned empty content")]
    EmptyContent,

    /// Neither fence stripping nor brace scanning produced a JSON object.
    #[error("Failed to parse JSON from LLM response: {reason}")]
    ResponseFormat { reason: String, raw: String },

    #[error("LLM JSON did not match the expected shape: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LlmError {
    /// Rate limits, 5xx responses and network failures are worth another attempt.
    /// Everything else (bad request, auth, undecodable body) fails fast.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Http(e) => !e.is_decode() && !e.is_builder(),
            _ => false,
        }
    }
}

/// One request to the provider. Built by `LlmClient`, consumed by a transport.
#[derive(Debug, Clone, Copy)]
pub struct LlmRequest<'a> {
    pub prompt: &'a str,
    pub system: Option<&'a str>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A single round-trip to an LLM provider. Implementations make exactly one
/// attempt; retries are `LlmClient`'s job.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    /// Whether a credential is available. Checked before any call is attempted.
    fn is_configured(&self) -> bool;

    async fn complete(&self, request: &LlmRequest<'_>) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages API transport
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
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

pub struct AnthropicTransport {
    client: Client,
    api_key: Option<String>,
}

impl AnthropicTransport {
    pub fn new(api_key: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(120)).build()?,
            api_key,
        })
    }
}

#[async_trait]
impl LlmTransport for AnthropicTransport {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &LlmRequest<'_>) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.filter(|s| !s.is_empty()),
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        llm_response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Exponential backoff: `base_delay`, then doubled after every failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: BASE_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// The single LLM client shared by all pipeline steps.
/// Cheap to clone; the transport is shared behind an `Arc`.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn LlmTransport>,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(transport: Arc<dyn LlmTransport>) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
        }
    }

    /// Client backed by the Anthropic Messages API.
    pub fn anthropic(api_key: Option<String>) -> Result<Self, LlmError> {
        Ok(Self::new(Arc::new(AnthropicTransport::new(api_key)?)))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_configured()
    }

    /// Sends a prompt and returns the raw response text.
    /// Retries transient provider failures with exponential backoff; any other
    /// failure is returned immediately.
    pub async fn send(
        &self,
        prompt: &str,
        system: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        if !self.transport.is_configured() {
            return Err(LlmError::MissingApiKey);
        }

        let request = LlmRequest {
            prompt,
            system,
            max_tokens,
            temperature,
        };
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.transport.complete(&request).await {
                Ok(text) => {
                    if attempt > 1 {
                        info!("LLM call succeeded on attempt {attempt}/{max_attempts}");
                    }
                    return Ok(text);
                }
                Err(e) if e.is_transient() => {
                    if attempt >= max_attempts {
                        return Err(LlmError::RetriesExhausted {
                            attempts: attempt,
                            source: Box::new(e),
                        });
                    }
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        "LLM call attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Calls the LLM at a lowered temperature and deserializes the JSON object
    /// found in its answer. The prompt must ask for a JSON object.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<T, LlmError> {
        let text = self
            .send(prompt, system, DEFAULT_MAX_TOKENS, JSON_TEMPERATURE)
            .await?;

        let value = json_extract::extract_json_object(&text).inspect_err(|e| {
            if let LlmError::ResponseFormat { raw, .. } = e {
                warn!("Unparseable LLM response ({} chars): {raw}", raw.chars().count());
            }
        })?;

        serde_json::from_value(value).map_err(LlmError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::testing::ScriptedTransport;
    use super::*;

    fn client_with(transport: &Arc<ScriptedTransport>) -> LlmClient {
        LlmClient::new(transport.clone())
    }

    #[test]
    fn test_retry_delays_double_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
        assert_eq!(policy.delay_after(3), Duration::from_secs(8));
    }

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::api(429, "rate limited").is_transient());
        assert!(LlmError::api(500, "boom").is_transient());
        assert!(LlmError::api(529, "overloaded").is_transient());
        assert!(!LlmError::api(400, "bad request").is_transient());
        assert!(!LlmError::api(401, "bad key").is_transient());
        assert!(!LlmError::MissingApiKey.is_transient());
        assert!(!LlmError::EmptyContent.is_transient());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_succeeds_after_two_transient_failures() {
        let transport = ScriptedTransport::new(vec![
            Err(LlmError::api(429, "rate limited")),
            Err(LlmError::api(503, "unavailable")),
            Ok("hello".to_string()),
        ]);
        let client = client_with(&transport);

        let started = tokio::time::Instant::now();
        let text = client.send("hi", None, 64, 0.7).await.unwrap();

        assert_eq!(text, "hello");
        assert_eq!(transport.call_count(), 3);
        // 2s after the first failure, 4s after the second
        assert!(started.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_retry_policy_limits_attempts_and_delays() {
        let transport = ScriptedTransport::new(vec![
            Err(LlmError::api(502, "bad gateway")),
            Err(LlmError::api(502, "bad gateway")),
            Ok("unused".to_string()),
        ]);
        let client = client_with(&transport).with_retry_policy(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(100),
        });

        let started = tokio::time::Instant::now();
        let err = client.send("hi", None, 64, 0.7).await.unwrap_err();

        assert!(matches!(err, LlmError::RetriesExhausted { attempts: 2, .. }));
        assert_eq!(transport.call_count(), 2);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_fails_with_provider_error_after_three_attempts() {
        let transport = ScriptedTransport::new(vec![
            Err(LlmError::api(500, "one")),
            Err(LlmError::api(500, "two")),
            Err(LlmError::api(500, "three")),
            Ok("never reached".to_string()),
        ]);
        let client = client_with(&transport);

        let err = client.send("hi", None, 64, 0.7).await.unwrap_err();

        match err {
            LlmError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(source.to_string().contains("three"));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![
            Err(LlmError::api(400, "malformed request")),
            Ok("never reached".to_string()),
        ]);
        let client = client_with(&transport);

        let err = client.send("hi", None, 64, 0.7).await.unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 400, .. }));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_call() {
        let transport = ScriptedTransport::unconfigured();
        let client = client_with(&transport);

        let err = client.send("hi", None, 64, 0.7).await.unwrap_err();

        assert!(matches!(err, LlmError::MissingApiKey));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_send_forwards_request_parameters() {
        let transport = ScriptedTransport::new(vec![Ok("ok".to_string())]);
        let client = client_with(&transport);

        client
            .send("the prompt", Some("the system"), 8192, 0.5)
            .await
            .unwrap();

        let recorded = transport.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].prompt, "the prompt");
        assert_eq!(recorded[0].system.as_deref(), Some("the system"));
        assert_eq!(recorded[0].max_tokens, 8192);
        assert!((recorded[0].temperature - 0.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_send_json_uses_lowered_temperature_and_parses_fenced_json() {
        let transport = ScriptedTransport::new(vec![Ok(
            "```json\n{\"score\": 42, \"tags\": [\"a\"]}\n```".to_string(),
        )]);
        let client = client_with(&transport);

        let value: Value = client.send_json("give json", None).await.unwrap();

        assert_eq!(value, json!({"score": 42, "tags": ["a"]}));
        let recorded = transport.requests();
        assert_eq!(recorded[0].max_tokens, DEFAULT_MAX_TOKENS);
        assert!((recorded[0].temperature - JSON_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_send_json_without_object_is_response_format_error() {
        let transport =
            ScriptedTransport::new(vec![Ok("I cannot help with that.".to_string())]);
        let client = client_with(&transport);

        let err = client.send_json::<Value>("give json", None).await.unwrap_err();

        match err {
            LlmError::ResponseFormat { raw, .. } => assert_eq!(raw, "I cannot help with that."),
            other => panic!("expected ResponseFormat, got {other:?}"),
        }
    }
}
