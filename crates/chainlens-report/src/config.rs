//! Configuration for report generation

use crate::error::{ReportError, Result};
use chainlens_llm::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Company analyzed when a query names none
pub const DEFAULT_COMPANY_ID: &str = "2330";

/// Upper bound for `earnings_call_limit`
pub const MAX_EARNINGS_CALLS: usize = 2;

/// Upper bound for `news_limit`
pub const MAX_NEWS_ARTICLES: usize = 5;

/// Configuration for the report pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory holding the knowledge-store JSON datasets
    pub data_dir: PathBuf,

    /// Model identifier passed to the generation backend
    pub model: String,

    /// Maximum tokens per generation request
    pub max_tokens: usize,

    /// Identifier used when the query names no known company
    pub default_company_id: String,

    /// Maximum earnings calls summarized per run
    pub earnings_call_limit: usize,

    /// Maximum news articles summarized per run
    pub news_limit: usize,

    /// Maximum number of attempts for generation calls
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Temperature for the supply-chain narrative
    pub supply_chain_temperature: f32,

    /// Temperature for the earnings key-point extraction
    pub key_points_temperature: f32,

    /// Temperature for the news highlight formatting
    pub news_highlights_temperature: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            model: "gemini-2.5-pro".to_string(),
            max_tokens: 8192,
            default_company_id: DEFAULT_COMPANY_ID.to_string(),
            earnings_call_limit: MAX_EARNINGS_CALLS,
            news_limit: MAX_NEWS_ARTICLES,
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            request_timeout: Duration::from_secs(120),
            supply_chain_temperature: 0.2,
            key_points_temperature: 0.2,
            news_highlights_temperature: 0.1,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Overlay `CHAINLENS_DATA_DIR` and `CHAINLENS_MODEL` when set
    pub fn with_env(mut self) -> Self {
        if let Ok(dir) = std::env::var("CHAINLENS_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(model) = std::env::var("CHAINLENS_MODEL") {
            self.model = model;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(ReportError::ConfigError(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if !(1..=MAX_EARNINGS_CALLS).contains(&self.earnings_call_limit) {
            return Err(ReportError::ConfigError(format!(
                "earnings_call_limit must be within 1..={MAX_EARNINGS_CALLS}, got {}",
                self.earnings_call_limit
            )));
        }

        if !(1..=MAX_NEWS_ARTICLES).contains(&self.news_limit) {
            return Err(ReportError::ConfigError(format!(
                "news_limit must be within 1..={MAX_NEWS_ARTICLES}, got {}",
                self.news_limit
            )));
        }

        if self.default_company_id.trim().is_empty() {
            return Err(ReportError::ConfigError(
                "default_company_id must not be empty".to_string(),
            ));
        }

        if self.model.trim().is_empty() || self.max_tokens == 0 {
            return Err(ReportError::ConfigError(
                "model and max_tokens must be set".to_string(),
            ));
        }

        for (name, value) in [
            ("supply_chain_temperature", self.supply_chain_temperature),
            ("key_points_temperature", self.key_points_temperature),
            ("news_highlights_temperature", self.news_highlights_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ReportError::ConfigError(format!(
                    "{name} must be within 0.0..=2.0, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Retry policy for the generation backend
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(self.max_retries, self.retry_backoff_base)
    }
}

/// Builder for ReportConfig
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    data_dir: Option<PathBuf>,
    model: Option<String>,
    max_tokens: Option<usize>,
    default_company_id: Option<String>,
    earnings_call_limit: Option<usize>,
    news_limit: Option<usize>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    request_timeout: Option<Duration>,
    supply_chain_temperature: Option<f32>,
    key_points_temperature: Option<f32>,
    news_highlights_temperature: Option<f32>,
}

impl ReportConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the fallback company identifier
    pub fn default_company_id(mut self, id: impl Into<String>) -> Self {
        self.default_company_id = Some(id.into());
        self
    }

    pub fn earnings_call_limit(mut self, limit: usize) -> Self {
        self.earnings_call_limit = Some(limit);
        self
    }

    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn supply_chain_temperature(mut self, temperature: f32) -> Self {
        self.supply_chain_temperature = Some(temperature);
        self
    }

    pub fn key_points_temperature(mut self, temperature: f32) -> Self {
        self.key_points_temperature = Some(temperature);
        self
    }

    pub fn news_highlights_temperature(mut self, temperature: f32) -> Self {
        self.news_highlights_temperature = Some(temperature);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ReportConfig> {
        let defaults = ReportConfig::default();

        let config = ReportConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            default_company_id: self
                .default_company_id
                .unwrap_or(defaults.default_company_id),
            earnings_call_limit: self
                .earnings_call_limit
                .unwrap_or(defaults.earnings_call_limit),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self
                .retry_backoff_base
                .unwrap_or(defaults.retry_backoff_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            supply_chain_temperature: self
                .supply_chain_temperature
                .unwrap_or(defaults.supply_chain_temperature),
            key_points_temperature: self
                .key_points_temperature
                .unwrap_or(defaults.key_points_temperature),
            news_highlights_temperature: self
                .news_highlights_temperature
                .unwrap_or(defaults.news_highlights_temperature),
        };

        config.validate()?;
        Ok(config)
    }
}
