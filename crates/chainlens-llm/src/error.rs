//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// The model answered with no text
    #[error("Model returned an empty completion")]
    EmptyResponse,

    /// Every attempt allowed by the retry policy failed
    #[error("Generation failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// No backend is configured
    #[error("Generation backend unavailable: {0}")]
    Unavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Whether a failed call may succeed if attempted again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_)
                | Self::RateLimitExceeded(_)
                | Self::HttpError(_)
                | Self::UnexpectedResponse(_)
                | Self::EmptyResponse
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(LLMError::RequestFailed("503".to_string()).is_retryable());
        assert!(LLMError::RateLimitExceeded("slow down".to_string()).is_retryable());
        assert!(LLMError::EmptyResponse.is_retryable());

        assert!(!LLMError::AuthenticationFailed.is_retryable());
        assert!(!LLMError::ModelNotFound("gpt-x".to_string()).is_retryable());
        assert!(!LLMError::Unavailable("no key".to_string()).is_retryable());
    }

    #[test]
    fn test_retries_exhausted_display() {
        let err = LLMError::RetriesExhausted {
            attempts: 3,
            last_error: "API request failed: timeout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Generation failed after 3 attempts: API request failed: timeout"
        );
    }
}
