//! Knowledge-store interfaces consumed by the pipeline stages
//!
//! Lookups never fail: a company with no data yields `None` or an empty list
//! and the calling stage writes its placeholder text. Loading is where errors
//! surface (see [`FileKnowledgeStore::load`]).

mod file;
mod graph;

pub use file::FileKnowledgeStore;
pub use graph::SupplyChainGraph;

use async_trait::async_trait;
use chainlens_core::model::{
    CompanyNode, EarningsCall, FinancialRecord, NewsArticle, QuarterlyDataset, RelatedCompanies,
};
use std::sync::Arc;

/// Latest-quarter financial records
#[async_trait]
pub trait FinancialStore: Send + Sync {
    async fn get_financial_record(&self, company_id: &str) -> Option<FinancialRecord>;
}

/// Detailed per-quarter time series
#[async_trait]
pub trait QuarterlyStore: Send + Sync {
    async fn get_quarterly_dataset(&self, company_id: &str) -> Option<QuarterlyDataset>;
}

/// Earnings-call records, most recent first
#[async_trait]
pub trait EarningsCallStore: Send + Sync {
    async fn get_earnings_calls(&self, company_id: &str, limit: usize) -> Vec<EarningsCall>;
}

/// News articles mentioning a company
#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn get_news(&self, company_id: &str, limit: usize) -> Vec<NewsArticle>;
}

/// In-memory snapshot of the supply-chain relationship graph
pub trait RelationshipGraph: Send + Sync {
    /// Node with the given identifier
    fn get_node(&self, company_id: &str) -> Option<&CompanyNode>;

    /// Customers, suppliers, partners and competitors of a company
    fn get_related(&self, company_id: &str) -> RelatedCompanies;

    fn contains(&self, company_id: &str) -> bool {
        self.get_node(company_id).is_some()
    }
}

/// Every source the pipeline reads from
#[derive(Clone)]
pub struct KnowledgeSources {
    pub financial: Arc<dyn FinancialStore>,
    pub quarterly: Arc<dyn QuarterlyStore>,
    pub earnings_calls: Arc<dyn EarningsCallStore>,
    pub news: Arc<dyn NewsStore>,
    pub graph: Arc<dyn RelationshipGraph>,
}

impl KnowledgeSources {
    /// Use one store for every source
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: FinancialStore
            + QuarterlyStore
            + EarningsCallStore
            + NewsStore
            + RelationshipGraph
            + 'static,
    {
        Self {
            financial: store.clone(),
            quarterly: store.clone(),
            earnings_calls: store.clone(),
            news: store.clone(),
            graph: store,
        }
    }
}
