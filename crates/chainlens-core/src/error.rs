//! Error types for chainlens-core

use thiserror::Error;

/// Result type alias for chainlens-core
pub type Result<T> = std::result::Result<T, StateError>;

/// Error raised when a state fragment cannot be merged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A stage tried to write a field that is already populated
    #[error("Field '{field}' is already set (written by stage '{stage}')")]
    FieldAlreadySet {
        field: &'static str,
        stage: &'static str,
    },
}
