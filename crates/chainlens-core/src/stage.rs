//! Stage trait definition

use crate::state::{AnalysisState, StateUpdate};
use async_trait::async_trait;

/// One step of the analysis pipeline
///
/// A stage reads the state populated so far and returns the fragment it owns.
/// Stages do not fail: missing data and backend errors are turned into
/// placeholder or fallback content inside the returned fragment.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Produce this stage's fragment for the given state
    async fn run(&self, state: &AnalysisState) -> StateUpdate;

    /// Get the stage's name
    fn name(&self) -> &str;
}
