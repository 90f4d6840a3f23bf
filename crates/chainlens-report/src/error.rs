//! Error types for report generation

use std::path::PathBuf;
use thiserror::Error;

/// Report pipeline errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// A knowledge-store dataset could not be loaded
    #[error("Failed to load {path}: {reason}")]
    StoreLoad { path: PathBuf, reason: String },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// A stage fragment conflicted with the current state
    #[error("State error: {0}")]
    StateError(#[from] chainlens_core::StateError),

    /// The report document could not be rendered
    #[error("Render error: {0}")]
    RenderError(String),

    /// The pipeline finished without producing a report
    #[error("Pipeline finished without a final report")]
    MissingReport,
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

impl From<std::fmt::Error> for ReportError {
    fn from(err: std::fmt::Error) -> Self {
        ReportError::RenderError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::StoreLoad {
            path: PathBuf::from("data/news.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load data/news.json: expected value at line 1 column 1"
        );

        assert_eq!(
            ReportError::MissingReport.to_string(),
            "Pipeline finished without a final report"
        );
    }

    #[test]
    fn test_state_error_conversion() {
        let err: ReportError = chainlens_core::StateError::FieldAlreadySet {
            field: "news_summary",
            stage: "news",
        }
        .into();
        assert!(err.to_string().contains("news_summary"));
    }

    #[test]
    fn test_fmt_error_becomes_render_error() {
        let err: ReportError = std::fmt::Error.into();
        assert!(matches!(err, ReportError::RenderError(_)));
    }
}
