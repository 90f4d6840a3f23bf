//! Pipeline stages
//!
//! Each stage reads the state built so far and returns the fragment it owns.
//! Retrieval stages render Markdown sections from the knowledge store; the
//! supply-chain stage is the only one that talks to the generation backend.

mod earnings_call;
mod financial;
mod news;
pub mod risk;
mod supervisor;
mod supply_chain;

pub use earnings_call::{EarningsCallStage, format_earnings_call_summary};
pub use financial::{FinancialStage, format_financial_summary, with_thousands};
pub use news::{NewsStage, format_news_summary};
pub use supervisor::{COMPANY_ALIASES, QueryResolver, SupervisorStage};
pub use supply_chain::{SupplyChainStage, supply_chain_payload};

use crate::config::DEFAULT_COMPANY_ID;
use chainlens_core::AnalysisState;

/// Company a stage should work on; stages run after resolution, so the
/// default only applies when a stage is driven on its own
fn target_company(state: &AnalysisState) -> &str {
    state.company_id().unwrap_or(DEFAULT_COMPANY_ID)
}
