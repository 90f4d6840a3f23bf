//! Configuration management utilities

use crate::LogFormat;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application-level configuration shared by the binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Tracing output format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "chainlens".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Defaults overlaid with `CHAINLENS_ENV` and `CHAINLENS_LOG_FORMAT`
    ///
    /// An unparseable log format is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(environment) = std::env::var("CHAINLENS_ENV") {
            config.environment = environment;
        }

        if let Ok(format) = std::env::var("CHAINLENS_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => config.log_format = format,
                Err(e) => warn!("Ignoring CHAINLENS_LOG_FORMAT: {}", e),
            }
        }

        config
    }
}
