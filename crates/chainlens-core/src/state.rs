//! Analysis state and the fragments stages write into it
//!
//! A run owns exactly one [`AnalysisState`]. Stages never mutate it directly:
//! each returns a [`StateUpdate`] naming only the fields that stage owns, and
//! the pipeline folds it in with [`AnalysisState::merge`]. A populated field
//! can never be cleared or overwritten.

use crate::error::{Result, StateError};
use crate::model::{CompanyNode, FinanceResults, SupplyChainAnalysis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Formatted text section that may hold a "no data" placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum SectionText {
    /// Formatted content built from retrieved records
    Content(String),
    /// Human-readable explanation that nothing was found
    Unavailable(String),
}

impl SectionText {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Content(text) | Self::Unavailable(text) => text,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Content(_))
    }

    /// Text of the section only when it holds real content
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Content(text) => Some(text),
            Self::Unavailable(_) => None,
        }
    }
}

impl fmt::Display for SectionText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fragment produced by one stage
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// Query resolver: identifier and graph profile
    Resolution {
        company_id: String,
        basic_info: CompanyNode,
    },
    Financial(FinanceResults),
    EarningsCall(SectionText),
    News(SectionText),
    SupplyChain(SupplyChainAnalysis),
    /// Report synthesizer: rendered document
    Report {
        final_report: String,
        validation_status: bool,
    },
}

impl StateUpdate {
    /// Name of the stage that owns this fragment
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Resolution { .. } => "supervisor",
            Self::Financial(_) => "financial",
            Self::EarningsCall(_) => "earnings_call",
            Self::News(_) => "news",
            Self::SupplyChain(_) => "supply_chain",
            Self::Report { .. } => "reporter",
        }
    }

    /// Fields written by this fragment
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Resolution { .. } => &["company_id", "basic_info"],
            Self::Financial(_) => &["finance_results"],
            Self::EarningsCall(_) => &["earnings_call_summary"],
            Self::News(_) => &["news_summary"],
            Self::SupplyChain(_) => &["supply_chain_analysis"],
            Self::Report { .. } => &["final_report", "validation_status"],
        }
    }
}

/// Shared record threaded through every stage of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisState {
    query: String,
    company_id: Option<String>,
    basic_info: Option<CompanyNode>,
    finance_results: Option<FinanceResults>,
    earnings_call_summary: Option<SectionText>,
    news_summary: Option<SectionText>,
    supply_chain_analysis: Option<SupplyChainAnalysis>,
    validation_status: Option<bool>,
    final_report: Option<String>,
}

impl AnalysisState {
    /// Fresh state for a query; every other field starts empty
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            company_id: None,
            basic_info: None,
            finance_results: None,
            earnings_call_summary: None,
            news_summary: None,
            supply_chain_analysis: None,
            validation_status: None,
            final_report: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn company_id(&self) -> Option<&str> {
        self.company_id.as_deref()
    }

    pub fn basic_info(&self) -> Option<&CompanyNode> {
        self.basic_info.as_ref()
    }

    pub fn finance_results(&self) -> Option<&FinanceResults> {
        self.finance_results.as_ref()
    }

    pub fn earnings_call_summary(&self) -> Option<&SectionText> {
        self.earnings_call_summary.as_ref()
    }

    pub fn news_summary(&self) -> Option<&SectionText> {
        self.news_summary.as_ref()
    }

    pub fn supply_chain_analysis(&self) -> Option<&SupplyChainAnalysis> {
        self.supply_chain_analysis.as_ref()
    }

    pub fn validation_status(&self) -> Option<bool> {
        self.validation_status
    }

    pub fn final_report(&self) -> Option<&str> {
        self.final_report.as_deref()
    }

    /// Names of all fields currently populated, `query` included
    pub fn populated_fields(&self) -> Vec<&'static str> {
        let slots = [
            ("company_id", self.company_id.is_some()),
            ("basic_info", self.basic_info.is_some()),
            ("finance_results", self.finance_results.is_some()),
            ("earnings_call_summary", self.earnings_call_summary.is_some()),
            ("news_summary", self.news_summary.is_some()),
            ("supply_chain_analysis", self.supply_chain_analysis.is_some()),
            ("validation_status", self.validation_status.is_some()),
            ("final_report", self.final_report.is_some()),
        ];

        std::iter::once("query")
            .chain(
                slots
                    .into_iter()
                    .filter_map(|(name, set)| set.then_some(name)),
            )
            .collect()
    }

    /// Fold a stage fragment into the state
    ///
    /// Fails with [`StateError::FieldAlreadySet`] if the fragment would
    /// overwrite a field that is already populated; the state is consumed
    /// either way, so callers keep the previous value if they need it.
    pub fn merge(mut self, update: StateUpdate) -> Result<Self> {
        let stage = update.stage();
        match update {
            StateUpdate::Resolution {
                company_id,
                basic_info,
            } => {
                ensure_empty(&self.company_id, "company_id", stage)?;
                ensure_empty(&self.basic_info, "basic_info", stage)?;
                self.company_id = Some(company_id);
                self.basic_info = Some(basic_info);
            }
            StateUpdate::Financial(results) => {
                ensure_empty(&self.finance_results, "finance_results", stage)?;
                self.finance_results = Some(results);
            }
            StateUpdate::EarningsCall(summary) => {
                ensure_empty(&self.earnings_call_summary, "earnings_call_summary", stage)?;
                self.earnings_call_summary = Some(summary);
            }
            StateUpdate::News(summary) => {
                ensure_empty(&self.news_summary, "news_summary", stage)?;
                self.news_summary = Some(summary);
            }
            StateUpdate::SupplyChain(analysis) => {
                ensure_empty(&self.supply_chain_analysis, "supply_chain_analysis", stage)?;
                self.supply_chain_analysis = Some(analysis);
            }
            StateUpdate::Report {
                final_report,
                validation_status,
            } => {
                ensure_empty(&self.final_report, "final_report", stage)?;
                ensure_empty(&self.validation_status, "validation_status", stage)?;
                self.final_report = Some(final_report);
                self.validation_status = Some(validation_status);
            }
        }
        Ok(self)
    }
}

fn ensure_empty<T>(slot: &Option<T>, field: &'static str, stage: &'static str) -> Result<()> {
    if slot.is_some() {
        return Err(StateError::FieldAlreadySet { field, stage });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(id: &str) -> StateUpdate {
        StateUpdate::Resolution {
            company_id: id.to_string(),
            basic_info: CompanyNode::unknown(id),
        }
    }

    #[test]
    fn test_new_state_has_only_query() {
        let state = AnalysisState::new("analyze TSMC");
        assert_eq!(state.query(), "analyze TSMC");
        assert_eq!(state.populated_fields(), vec!["query"]);
        assert!(state.final_report().is_none());
    }

    #[test]
    fn test_merge_populates_owned_fields() {
        let state = AnalysisState::new("q").merge(resolution("2330")).unwrap();
        assert_eq!(state.company_id(), Some("2330"));
        assert_eq!(state.basic_info().unwrap().id, "2330");

        let state = state
            .merge(StateUpdate::News(SectionText::Unavailable(
                "No recent news available for company 2330.".to_string(),
            )))
            .unwrap();
        assert!(!state.news_summary().unwrap().is_available());
        assert_eq!(
            state.populated_fields(),
            vec!["query", "company_id", "basic_info", "news_summary"]
        );
    }

    #[test]
    fn test_merge_rejects_overwrite() {
        let state = AnalysisState::new("q").merge(resolution("2330")).unwrap();
        let err = state.merge(resolution("NVDA")).unwrap_err();
        assert_eq!(
            err,
            StateError::FieldAlreadySet {
                field: "company_id",
                stage: "supervisor",
            }
        );
    }

    #[test]
    fn test_report_fragment_sets_validation_status() {
        let state = AnalysisState::new("q")
            .merge(StateUpdate::Report {
                final_report: "# Report".to_string(),
                validation_status: true,
            })
            .unwrap();
        assert_eq!(state.final_report(), Some("# Report"));
        assert_eq!(state.validation_status(), Some(true));

        let err = state
            .merge(StateUpdate::Report {
                final_report: "# Again".to_string(),
                validation_status: true,
            })
            .unwrap_err();
        assert!(err.to_string().contains("final_report"));
    }

    #[test]
    fn test_fragment_write_sets_are_disjoint() {
        let updates = [
            resolution("2330"),
            StateUpdate::Financial(FinanceResults {
                raw_data: None,
                summary: String::new(),
            }),
            StateUpdate::EarningsCall(SectionText::Content(String::new())),
            StateUpdate::News(SectionText::Content(String::new())),
            StateUpdate::SupplyChain(SupplyChainAnalysis::unavailable("2330")),
            StateUpdate::Report {
                final_report: String::new(),
                validation_status: true,
            },
        ];

        let mut seen = std::collections::HashSet::new();
        for update in &updates {
            for field in update.fields() {
                assert!(seen.insert(*field), "{field} written by two stages");
            }
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_section_text_content() {
        let text = SectionText::Content("## 近期新聞摘要".to_string());
        assert_eq!(text.content(), Some("## 近期新聞摘要"));
        assert_eq!(text.to_string(), "## 近期新聞摘要");

        let text = SectionText::Unavailable("none".to_string());
        assert!(text.content().is_none());
        assert_eq!(text.as_str(), "none");
    }
}
