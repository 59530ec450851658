/*!
 * Translation invoker.
 *
 * Turns one source string into one translated string: builds the
 * placeholder-protection prompt, calls the model at temperature 0 with the
 * response schema, and strictly parses the answer.
 */

use async_trait::async_trait;
use indicatif::ProgressBar;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::prompts::{PromptTemplate, TranslationPayload, missing_placeholders};
use crate::app_config::VariableMode;
use crate::errors::TranslationError;
use crate::language_utils::display_name;
use crate::providers::Provider;
use crate::providers::ollama::{ChatMessage, ChatRequest, ChatResponse};

/// Anything that can translate a single string
///
/// The tree walker only depends on this trait, so tests can swap the model
/// for a deterministic fake.
#[async_trait]
pub trait TextTranslator: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`, keeping
    /// every placeholder of `mode` intact
    async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        mode: VariableMode,
    ) -> Result<String, TranslationError>;
}

#[async_trait]
impl<T: TextTranslator + ?Sized> TextTranslator for Arc<T> {
    async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        mode: VariableMode,
    ) -> Result<String, TranslationError> {
        (**self).translate_text(text, source_language, target_language, mode).await
    }
}

/// Translator backed by a chat model provider
#[derive(Debug)]
pub struct LlmTranslator<P> {
    /// Chat provider (Ollama in production)
    provider: P,
    /// Model name sent with every request
    model: String,
    /// Progress bar advanced once per translated string
    progress: Option<ProgressBar>,
    /// Optional cap on in-flight model calls
    limiter: Option<Arc<Semaphore>>,
}

impl<P> LlmTranslator<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    /// Create a translator using `provider` and `model`
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            progress: None,
            limiter: None,
        }
    }

    /// Advance `progress` after each successful translation
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Allow at most `limit` model calls in flight; `None` means unbounded
    pub fn with_concurrency_limit(mut self, limit: Option<usize>) -> Self {
        self.limiter = limit.map(|n| Arc::new(Semaphore::new(n.max(1))));
        self
    }

    /// The provider behind this translator
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Build the chat request for one string
    pub fn build_request(&self, text: &str, source_language: &str, target_language: &str, mode: VariableMode) -> ChatRequest {
        let prompt = PromptTemplate::for_mode(mode).render(
            &display_name(source_language),
            &display_name(target_language),
            text,
        );

        ChatRequest::new(self.model.clone(), vec![ChatMessage::user(prompt)])
            .temperature(0.0)
            .format(TranslationPayload::schema())
            .no_stream()
    }

    fn advance_progress(&self) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }
}

#[async_trait]
impl<P> TextTranslator for LlmTranslator<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        mode: VariableMode,
    ) -> Result<String, TranslationError> {
        // Blank strings skip the model; the result is trimmed like any answer
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.advance_progress();
            return Ok(trimmed.to_string());
        }

        let request = self.build_request(text, source_language, target_language, mode);

        let response = {
            let _permit = match &self.limiter {
                Some(limiter) => Some(limiter.acquire().await.map_err(TranslationError::failure)?),
                None => None,
            };
            self.provider.complete(request).await?
        };

        let raw = P::extract_text(&response);
        let payload = TranslationPayload::parse(&raw).map_err(|e| {
            TranslationError::failure(format!(
                "model answer does not match the response schema: {} (answer: {})",
                e,
                truncate_text(&raw, 120)
            ))
        })?;

        let translated = payload.translation.trim().to_string();
        let missing = missing_placeholders(text, &translated, mode);
        if !missing.is_empty() {
            warn!("Translation to {} dropped placeholder(s) {}: '{}'",
                  target_language, missing.join(", "), truncate_text(text, 60));
        }

        debug!("'{}' -> '{}' ({})", truncate_text(text, 30), truncate_text(&translated, 30), target_language);
        self.advance_progress();
        Ok(translated)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
