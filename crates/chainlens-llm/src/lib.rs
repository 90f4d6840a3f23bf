//! Text-generation backend for chainlens
//!
//! This crate provides the provider-agnostic pieces the report pipeline uses
//! to talk to a chat-completion model:
//!
//! - Message and completion request/response types
//! - The [`LLMProvider`] trait and an OpenAI-compatible implementation
//! - [`RetryPolicy`] with exponential backoff
//! - The narrow [`TextGenerator`] interface consumed by pipeline stages

pub mod completion;
pub mod error;
pub mod generator;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod retry;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use generator::{ProviderGenerator, TextGenerator, UnavailableGenerator};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
pub use retry::RetryPolicy;
