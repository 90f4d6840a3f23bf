//! Company analysis report pipeline
//!
//! Turns a free-text query about a company into a structured Markdown report.
//! One [`AnalysisState`](chainlens_core::AnalysisState) is threaded through
//! six stages run strictly in order:
//!
//! - `SupervisorStage`: resolves the query to a company identifier
//! - `FinancialStage`: latest financial record and summary
//! - `EarningsCallStage`: most recent earnings calls
//! - `NewsStage`: recent articles mentioning the company
//! - `SupplyChainStage`: relationship graph analysis with a generated or
//!   rule-based risk narrative
//! - `ReportSynthesizer`: assembles the final document
//!
//! Data comes from the knowledge-store traits in [`store`]; text generation
//! goes through [`chainlens_llm::TextGenerator`]. A backend that always fails
//! still yields a complete report.
//!
//! # Example
//!
//! ```rust,ignore
//! use chainlens_llm::UnavailableGenerator;
//! use chainlens_report::{FileKnowledgeStore, KnowledgeSources, ReportConfig, ReportPipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ReportConfig::default();
//!     let store = Arc::new(FileKnowledgeStore::load(&config.data_dir).await?);
//!     let generator = Arc::new(UnavailableGenerator::new("offline"));
//!
//!     let pipeline = ReportPipeline::new(&config, KnowledgeSources::from_store(store), generator)?;
//!     println!("{}", pipeline.generate_report("台積電供應鏈風險").await?);
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod config;
pub mod engine;
pub mod error;
pub mod prompts;
pub mod report;
pub mod store;

#[cfg(test)]
mod testing;

pub use agents::{
    EarningsCallStage, FinancialStage, NewsStage, QueryResolver, SupervisorStage,
    SupplyChainStage,
};
pub use config::{ReportConfig, ReportConfigBuilder};
pub use engine::{PipelineStep, ReportPipeline};
pub use error::{ReportError, Result};
pub use report::{FinancialTable, ReportSynthesizer};
pub use store::{
    EarningsCallStore, FileKnowledgeStore, FinancialStore, KnowledgeSources, NewsStore,
    QuarterlyStore, RelationshipGraph, SupplyChainGraph,
};
