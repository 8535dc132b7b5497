//! Response generator: persona replies and word translation through the
//! completion provider.
//!
//! Every call goes through the shared [`RetryPolicy`] and is bounded by a
//! whole-call deadline. Quota exhaustion turns into an in-character apology
//! rather than an error; translation never fails at all.

use std::time::Duration;

use lingochat_types::chat::ChatMessage;
use lingochat_types::config::{LlmConfig, RetryConfig};
use lingochat_types::error::ChatError;
use lingochat_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message};
use lingochat_types::speaker::Speaker;
use lingochat_types::translation::WordTranslation;
use tracing::{Instrument, debug, info_span, warn};

use crate::chat::prompt;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::retry::RetryPolicy;

const TRANSLATION_MAX_TOKENS: u32 = 256;
const TRANSLATION_TEMPERATURE: f64 = 0.2;

/// Model and call-shaping settings.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: Option<f64>,
    /// Deadline for one logical call, retries included.
    pub deadline: Duration,
    pub retry: RetryPolicy,
}

impl GeneratorSettings {
    pub fn from_config(llm: &LlmConfig, retry: &RetryConfig) -> Self {
        Self {
            model: llm.model.clone(),
            max_output_tokens: llm.max_output_tokens,
            temperature: llm.temperature,
            deadline: Duration::from_secs(llm.timeout_secs),
            retry: RetryPolicy::from_config(retry),
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default(), &RetryConfig::default())
    }
}

#[derive(Debug)]
pub struct ResponseGenerator {
    provider: BoxLlmProvider,
    settings: GeneratorSettings,
}

impl ResponseGenerator {
    pub fn new(provider: BoxLlmProvider, settings: GeneratorSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Produce the speaker's next line.
    ///
    /// `history` is the context window preceding `user_text`, oldest first;
    /// it is expected to already be bounded by the caller.
    pub async fn generate_reply(
        &self,
        speaker: &Speaker,
        user_text: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt::build_conversation(
                speaker, history, user_text,
            ))],
            system: Some(prompt::build_system_instruction(speaker)),
            max_tokens: self.settings.max_output_tokens,
            temperature: self.settings.temperature,
        };

        let span = info_span!(
            "gen_ai.reply",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            speaker_id = %speaker.id,
            history_len = history.len(),
        );

        let result = self
            .complete_with_retry("generate_reply", &request)
            .instrument(span.clone())
            .await;
        match result {
            Ok(response) => {
                span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
                span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
                let reply = response.content.trim();
                if reply.is_empty() {
                    return Err(ChatError::Generation(
                        "completion service returned an empty reply".to_string(),
                    ));
                }
                debug!(
                    speaker_id = %speaker.id,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Speaker reply generated"
                );
                Ok(reply.to_string())
            }
            Err(e) if e.is_resource_exhausted() => {
                warn!(
                    speaker_id = %speaker.id,
                    language = %speaker.language,
                    "Completion quota exhausted, replying with fallback phrase"
                );
                Ok(prompt::fallback_phrase(&speaker.language).to_string())
            }
            Err(e) => Err(ChatError::Generation(e.to_string())),
        }
    }

    /// Translate a word into each target language.
    ///
    /// Any provider failure or unparsable reply yields one untranslated
    /// placeholder per requested language.
    pub async fn translate_word(
        &self,
        word: &str,
        from_language: &str,
        to_languages: &[String],
    ) -> Vec<WordTranslation> {
        if to_languages.is_empty() {
            return Vec::new();
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt::build_translation_prompt(
                word,
                from_language,
                to_languages,
            ))],
            system: None,
            max_tokens: TRANSLATION_MAX_TOKENS,
            temperature: Some(TRANSLATION_TEMPERATURE),
        };

        let span = info_span!(
            "gen_ai.translate",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            from = %from_language,
            targets = to_languages.len(),
        );

        let parsed = match self.complete_with_retry("translate_word", &request).instrument(span).await {
            Ok(response) => {
                let parsed = prompt::parse_translations(&response.content);
                if parsed.is_none() {
                    warn!(word, "Translation reply was not a JSON array, using placeholders");
                }
                parsed
            }
            Err(e) => {
                warn!(word, error = %e, "Translation failed, using placeholders");
                None
            }
        };

        parsed.unwrap_or_else(|| {
            to_languages
                .iter()
                .map(|language| WordTranslation::placeholder(language.as_str(), word))
                .collect()
        })
    }

    async fn complete_with_retry(
        &self,
        operation: &str,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let provider = &self.provider;
        let deadline = self.settings.deadline;
        let attempts = self
            .settings
            .retry
            .run(operation, move || provider.complete(request));

        match tokio::time::timeout(deadline, attempts).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                after_ms: deadline.as_millis() as u64,
            }),
        }
    }
}
