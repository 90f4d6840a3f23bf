//! Narrow text-generation interface used by the pipeline stages
//!
//! Stages only ever need "system prompt + user prompt + temperature in, text
//! out". [`TextGenerator`] is that seam; [`ProviderGenerator`] implements it
//! over any [`LLMProvider`] with bounded retries, and [`UnavailableGenerator`]
//! stands in when no backend is configured so every caller takes its fallback.

use crate::{CompletionRequest, LLMError, LLMProvider, Message, Result, RetryPolicy};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Produces text from a pair of prompts
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion; an empty completion is an error
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String>;
}

/// [`TextGenerator`] backed by an [`LLMProvider`] and a [`RetryPolicy`]
pub struct ProviderGenerator {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: usize,
    retry: RetryPolicy,
}

impl ProviderGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 8192,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for ProviderGenerator {
    #[instrument(skip(self, system_prompt, user_prompt), fields(provider = %self.provider.name(), model = %self.model))]
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String> {
        debug!(
            "Prompt sizes - system: {} chars, user: {} chars",
            system_prompt.chars().count(),
            user_prompt.chars().count()
        );

        let text = self
            .retry
            .execute("generate", || {
                let request = CompletionRequest::builder(self.model.clone())
                    .system(system_prompt)
                    .add_message(Message::user(user_prompt))
                    .max_tokens(self.max_tokens)
                    .temperature(temperature)
                    .build();
                async move {
                    let response = self.provider.complete(request).await?;
                    let text = response.message.content;
                    if text.trim().is_empty() {
                        return Err(LLMError::EmptyResponse);
                    }
                    Ok(text)
                }
            })
            .await?;

        info!("Generated {} chars", text.chars().count());
        Ok(text)
    }
}

/// Generator that always fails, used when no credentials are configured
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _temperature: f32,
    ) -> Result<String> {
        Err(LLMError::Unavailable(self.reason.clone()))
    }
}
