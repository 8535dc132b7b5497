//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends non-streaming requests to `v1beta/models/{model}:generateContent`.
//! The API key travels in the `x-goog-api-key` header and is held as a
//! [`SecretString`], so it never ends up in request URLs or logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use lingochat_core::llm::provider::LlmProvider;
use lingochat_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole, Usage};

use super::types::{
    GeminiContent, GeminiErrorResponse, GeminiGenerationConfig, GeminiRequest, GeminiResponse,
};

/// Status string Gemini uses for quota and rate-limit rejections.
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// Google Gemini completion provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    /// Create a provider with a per-request HTTP timeout.
    pub fn new(api_key: SecretString, request_timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (proxies, regional endpoints, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    MessageRole::User => "user",
                };
                GeminiContent::text(Some(role), m.content.clone())
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction: request
                .system
                .as_ref()
                .map(|s| GeminiContent::text(None, s.clone())),
            generation_config: GeminiGenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }

    /// Map a non-success HTTP response to an [`LlmError`].
    fn map_error_status(status: u16, body: &str, retry_after: Option<&str>) -> LlmError {
        let parsed = serde_json::from_str::<GeminiErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .map(|p| p.error.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.to_string());
        let exhausted = parsed
            .as_ref()
            .and_then(|p| p.error.status.as_deref())
            .is_some_and(|s| s == RESOURCE_EXHAUSTED);

        if status == 429 || exhausted {
            let retry_after_ms = retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000));
            return LlmError::ResourceExhausted { retry_after_ms };
        }

        match status {
            400 => LlmError::InvalidRequest(message),
            401 | 403 => LlmError::AuthenticationFailed,
            503 => LlmError::Overloaded(message),
            500..=599 => LlmError::ServerError(format!("HTTP {status}: {message}")),
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }

    fn map_transport_error(e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Network(format!("request timeout: {e}"))
        } else if e.is_connect() || e.is_request() {
            LlmError::Network(format!("connection failed: {e}"))
        } else {
            LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            }
        }
    }

    fn normalize_response(
        resp: GeminiResponse,
        requested_model: &str,
    ) -> Result<CompletionResponse, LlmError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Provider {
                message: "no candidates in response".to_string(),
            })?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let usage = resp.usage_metadata.unwrap_or_default();
        Ok(CompletionResponse {
            content,
            model: resp
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            finish_reason: candidate.finish_reason,
            usage: Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_gemini_request(request);

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::map_error_status(
                status.as_u16(),
                &error_body,
                retry_after.as_deref(),
            ));
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        Self::normalize_response(gemini_resp, &request.model)
    }
}
