//! Shared utilities for chainlens
//!
//! Logging setup and the environment-level application configuration used by
//! the `chainlens` binary.

pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::{LogFormat, init_tracing};
