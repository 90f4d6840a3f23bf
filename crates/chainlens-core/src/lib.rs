//! Core abstractions for chainlens
//!
//! This crate defines the analysis state shared by every pipeline stage, the
//! typed fragments stages write into it, the [`Stage`] trait and the domain
//! records (companies, financials, earnings calls, news).

pub mod error;
pub mod model;
pub mod stage;
pub mod state;

pub use error::{Result, StateError};
pub use stage::Stage;
pub use state::{AnalysisState, SectionText, StateUpdate};
