//! JSON-file backed knowledge store

use super::{
    EarningsCallStore, FinancialStore, NewsStore, QuarterlyStore, RelationshipGraph,
    SupplyChainGraph,
};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use chainlens_core::model::{
    CompanyNode, EarningsCall, FinancialRecord, NewsArticle, QuarterlyDataset, RelatedCompanies,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

const FINANCIALS_FILE: &str = "financials.json";
const FINANCIALS_EXTENDED_FILE: &str = "financials_extended.json";
const EARNINGS_CALLS_FILE: &str = "earnings_calls.json";
const NEWS_FILE: &str = "news.json";
const GRAPH_FILE: &str = "supply_chain_graph.json";

/// Knowledge store loaded once from a data directory
///
/// | file | shape |
/// |---|---|
/// | `financials.json` | company id → financial record |
/// | `financials_extended.json` | company id → quarterly dataset |
/// | `earnings_calls.json` | company id → calls, most recent first |
/// | `news.json` | list of articles with `related_companies` |
/// | `supply_chain_graph.json` | `{nodes, edges}` |
#[derive(Debug, Clone, Default)]
pub struct FileKnowledgeStore {
    financials: HashMap<String, FinancialRecord>,
    quarterly: HashMap<String, QuarterlyDataset>,
    earnings_calls: HashMap<String, Vec<EarningsCall>>,
    news: Vec<NewsArticle>,
    graph: SupplyChainGraph,
}

impl FileKnowledgeStore {
    /// Load every dataset from `dir`
    ///
    /// A missing file is treated as an empty dataset; a file that exists but
    /// cannot be read or parsed is an error.
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!("Loading knowledge store from {}", dir.display());

        let graph = match read_optional(&dir.join(GRAPH_FILE)).await? {
            Some(json) => SupplyChainGraph::from_json(&json).map_err(|e| ReportError::StoreLoad {
                path: dir.join(GRAPH_FILE),
                reason: e.to_string(),
            })?,
            None => SupplyChainGraph::default(),
        };

        let store = Self {
            financials: load_dataset(&dir.join(FINANCIALS_FILE)).await?,
            quarterly: load_dataset(&dir.join(FINANCIALS_EXTENDED_FILE)).await?,
            earnings_calls: load_dataset(&dir.join(EARNINGS_CALLS_FILE)).await?,
            news: load_dataset(&dir.join(NEWS_FILE)).await?,
            graph,
        };

        info!(
            "Knowledge store ready: {} financial records, {} quarterly datasets, {} earnings-call companies, {} articles, {} graph nodes",
            store.financials.len(),
            store.quarterly.len(),
            store.earnings_calls.len(),
            store.news.len(),
            store.graph.nodes().len()
        );

        Ok(store)
    }

    pub fn with_financial_record(mut self, company_id: impl Into<String>, record: FinancialRecord) -> Self {
        self.financials.insert(company_id.into(), record);
        self
    }

    pub fn with_quarterly_dataset(
        mut self,
        company_id: impl Into<String>,
        dataset: QuarterlyDataset,
    ) -> Self {
        self.quarterly.insert(company_id.into(), dataset);
        self
    }

    pub fn with_earnings_calls(mut self, company_id: impl Into<String>, calls: Vec<EarningsCall>) -> Self {
        self.earnings_calls.insert(company_id.into(), calls);
        self
    }

    pub fn with_news(mut self, articles: Vec<NewsArticle>) -> Self {
        self.news = articles;
        self
    }

    pub fn with_graph(mut self, graph: SupplyChainGraph) -> Self {
        self.graph = graph;
        self
    }

    pub fn graph(&self) -> &SupplyChainGraph {
        &self.graph
    }
}

/// File contents, or `None` when the file does not exist
async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            debug!("Read {} ({} bytes)", path.display(), contents.len());
            Ok(Some(contents))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} not found, using an empty dataset", path.display());
            Ok(None)
        }
        Err(e) => Err(ReportError::StoreLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

async fn load_dataset<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match read_optional(path).await? {
        Some(json) => serde_json::from_str(&json).map_err(|e| ReportError::StoreLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        None => Ok(T::default()),
    }
}

#[async_trait]
impl FinancialStore for FileKnowledgeStore {
    async fn get_financial_record(&self, company_id: &str) -> Option<FinancialRecord> {
        self.financials.get(company_id).cloned()
    }
}

#[async_trait]
impl QuarterlyStore for FileKnowledgeStore {
    async fn get_quarterly_dataset(&self, company_id: &str) -> Option<QuarterlyDataset> {
        self.quarterly.get(company_id).cloned()
    }
}

#[async_trait]
impl EarningsCallStore for FileKnowledgeStore {
    async fn get_earnings_calls(&self, company_id: &str, limit: usize) -> Vec<EarningsCall> {
        self.earnings_calls
            .get(company_id)
            .map(|calls| calls.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NewsStore for FileKnowledgeStore {
    async fn get_news(&self, company_id: &str, limit: usize) -> Vec<NewsArticle> {
        self.news
            .iter()
            .filter(|article| article.mentions(company_id))
            .take(limit)
            .cloned()
            .collect()
    }
}

impl RelationshipGraph for FileKnowledgeStore {
    fn get_node(&self, company_id: &str) -> Option<&CompanyNode> {
        self.graph.get_node(company_id)
    }

    fn get_related(&self, company_id: &str) -> RelatedCompanies {
        self.graph.get_related(company_id)
    }
}
