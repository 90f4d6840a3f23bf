//! Query resolution stage
//!
//! Maps a free-text query to a company identifier known to the relationship
//! graph. Resolution never fails: an unrecognized query falls back to the
//! configured default company.

use crate::error::{ReportError, Result};
use crate::store::RelationshipGraph;
use async_trait::async_trait;
use chainlens_core::model::CompanyNode;
use chainlens_core::{AnalysisState, Stage, StateUpdate};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

/// Company names and nicknames, checked in order against the lowercased query
pub const COMPANY_ALIASES: &[(&str, &str)] = &[
    ("tsmc", "2330"),
    ("台積電", "2330"),
    ("apple", "AAPL"),
    ("蘋果", "AAPL"),
    ("nvidia", "NVDA"),
    ("輝達", "NVDA"),
    ("amd", "AMD"),
    ("超微", "AMD"),
    ("intel", "INTC"),
    ("英特爾", "INTC"),
    ("asml", "ASML"),
    ("艾司摩爾", "ASML"),
    ("samsung", "5930"),
    ("三星", "5930"),
    ("qualcomm", "QCOM"),
    ("高通", "QCOM"),
    ("mediatek", "2454"),
    ("mtk", "2454"),
    ("聯發科", "2454"),
    ("tesla", "TSLA"),
    ("特斯拉", "TSLA"),
    ("microsoft", "MSFT"),
    ("微軟", "MSFT"),
    ("google", "GOOG"),
    ("谷歌", "GOOG"),
    ("amazon", "AMZN"),
    ("aws", "AMZN"),
    ("亞馬遜", "AMZN"),
];

/// Four-digit exchange codes or two-to-four letter tickers
const TICKER_PATTERN: &str = r"\b([0-9]{4}|[A-Z]{2,4})\b";

/// Resolves free-text queries to company identifiers
#[derive(Debug, Clone)]
pub struct QueryResolver {
    ticker: Regex,
    default_company_id: String,
}

impl QueryResolver {
    pub fn new(default_company_id: impl Into<String>) -> Result<Self> {
        let ticker =
            Regex::new(TICKER_PATTERN).map_err(|e| ReportError::InvalidPattern(e.to_string()))?;
        Ok(Self {
            ticker,
            default_company_id: default_company_id.into(),
        })
    }

    pub fn default_company_id(&self) -> &str {
        &self.default_company_id
    }

    /// Resolve a query against the graph
    ///
    /// Tried in order:
    /// 1. ticker-like tokens of the uppercased query that exist in the graph
    /// 2. the alias table, matched as substrings of the lowercased query
    /// 3. the default company
    pub fn resolve(&self, query: &str, graph: &dyn RelationshipGraph) -> String {
        let upper = query.to_uppercase();
        if let Some(token) = self
            .ticker
            .find_iter(&upper)
            .map(|m| m.as_str())
            .find(|token| graph.contains(token))
        {
            debug!("Matched ticker token {token}");
            return token.to_string();
        }

        let lower = query.to_lowercase();
        if let Some((alias, company_id)) = COMPANY_ALIASES
            .iter()
            .find(|(alias, _)| lower.contains(alias))
        {
            debug!("Matched alias '{alias}' -> {company_id}");
            return (*company_id).to_string();
        }

        debug!(
            "No company recognized in query, using default {}",
            self.default_company_id
        );
        self.default_company_id.clone()
    }
}

/// First stage: resolves the query and attaches the company's graph profile
pub struct SupervisorStage {
    resolver: QueryResolver,
    graph: Arc<dyn RelationshipGraph>,
}

impl SupervisorStage {
    pub fn new(resolver: QueryResolver, graph: Arc<dyn RelationshipGraph>) -> Self {
        Self { resolver, graph }
    }
}

#[async_trait]
impl Stage for SupervisorStage {
    async fn run(&self, state: &AnalysisState) -> StateUpdate {
        let company_id = self.resolver.resolve(state.query(), self.graph.as_ref());
        let basic_info = self
            .graph
            .get_node(&company_id)
            .cloned()
            .unwrap_or_else(|| CompanyNode::unknown(&company_id));

        info!("Resolved query to {} ({})", company_id, basic_info.name);

        StateUpdate::Resolution {
            company_id,
            basic_info,
        }
    }

    fn name(&self) -> &str {
        "supervisor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_graph;
    use chainlens_core::model::NodeRole;

    fn resolver() -> QueryResolver {
        QueryResolver::new("2330").unwrap()
    }

    #[test]
    fn test_ticker_in_graph_wins() {
        let graph = fixture_graph();
        assert_eq!(resolver().resolve("What about nvda supply risk?", &graph), "NVDA");
        assert_eq!(resolver().resolve("compare 5930 capacity", &graph), "5930");
    }

    #[test]
    fn test_ticker_not_in_graph_is_skipped() {
        let graph = fixture_graph();
        // "AI" and "HBM" look like tickers but are not graph nodes
        assert_eq!(resolver().resolve("AI HBM demand at Apple", &graph), "AAPL");
    }

    #[test]
    fn test_alias_lookup() {
        let graph = fixture_graph();
        assert_eq!(resolver().resolve("Analyze Nvidia supply chain", &graph), "NVDA");
        assert_eq!(resolver().resolve("請分析輝達的供應鏈", &graph), "NVDA");
        assert_eq!(resolver().resolve("請告訴我 Nvidia 的供應鏈關係", &graph), "NVDA");
        // Alias hits are returned even when the graph lacks the company
        assert_eq!(resolver().resolve("聯發科近況", &graph), "2454");
    }

    #[test]
    fn test_alias_table_order() {
        let graph = fixture_graph();
        // "tsmc" precedes "apple" in the table
        assert_eq!(resolver().resolve("apple and tsmc", &graph), "2330");
    }

    #[test]
    fn test_unrecognized_query_uses_default() {
        let graph = fixture_graph();
        assert_eq!(resolver().resolve("hello world", &graph), "2330");
        assert_eq!(resolver().resolve("", &graph), "2330");

        let custom = QueryResolver::new("AAPL").unwrap();
        assert_eq!(custom.resolve("nothing here", &graph), "AAPL");
        assert_eq!(custom.default_company_id(), "AAPL");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let graph = fixture_graph();
        let resolver = resolver();
        for query in ["請分析台積電", "AMD outlook", "random text"] {
            assert_eq!(resolver.resolve(query, &graph), resolver.resolve(query, &graph));
        }
    }

    #[tokio::test]
    async fn test_stage_attaches_profile() {
        let graph: Arc<dyn RelationshipGraph> = Arc::new(fixture_graph());
        let stage = SupervisorStage::new(resolver(), graph);

        let update = stage.run(&AnalysisState::new("台積電供應鏈風險")).await;
        match update {
            StateUpdate::Resolution {
                company_id,
                basic_info,
            } => {
                assert_eq!(company_id, "2330");
                assert_eq!(basic_info.name, "TSMC");
                assert_eq!(basic_info.role, NodeRole::SelfNode);
            }
            other => panic!("expected Resolution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stage_unknown_company_gets_placeholder() {
        let graph: Arc<dyn RelationshipGraph> = Arc::new(fixture_graph());
        let stage = SupervisorStage::new(resolver(), graph);

        let update = stage.run(&AnalysisState::new("tesla")).await;
        let StateUpdate::Resolution {
            company_id,
            basic_info,
        } = update
        else {
            panic!("expected Resolution");
        };
        assert_eq!(company_id, "TSLA");
        assert_eq!(basic_info.name, "Unknown");
        assert_eq!(basic_info.id, "TSLA");
        assert_eq!(stage.name(), "supervisor");
    }
}
