//! Earnings-call retrieval stage

use super::target_company;
use crate::store::EarningsCallStore;
use async_trait::async_trait;
use chainlens_core::model::EarningsCall;
use chainlens_core::{AnalysisState, SectionText, Stage, StateUpdate};
use std::sync::Arc;
use tracing::{info, warn};

/// Summarizes the most recent earnings calls of the target company
pub struct EarningsCallStage {
    store: Arc<dyn EarningsCallStore>,
    limit: usize,
}

impl EarningsCallStage {
    pub fn new(store: Arc<dyn EarningsCallStore>, limit: usize) -> Self {
        Self { store, limit }
    }
}

#[async_trait]
impl Stage for EarningsCallStage {
    async fn run(&self, state: &AnalysisState) -> StateUpdate {
        let company_id = target_company(state);
        let calls = self.store.get_earnings_calls(company_id, self.limit).await;

        let summary = if calls.is_empty() {
            warn!("No earnings calls for {}", company_id);
            SectionText::Unavailable(format!(
                "No earnings call data available for company {company_id}."
            ))
        } else {
            info!("Summarizing {} earnings calls for {}", calls.len(), company_id);
            SectionText::Content(format_earnings_call_summary(&calls))
        };

        StateUpdate::EarningsCall(summary)
    }

    fn name(&self) -> &str {
        "earnings_call"
    }
}

pub fn format_earnings_call_summary(calls: &[EarningsCall]) -> String {
    let mut summary = String::from("## 法說會重點摘要\n\n");

    for call in calls {
        summary.push_str(&format!("### {} ({})\n\n", call.title, call.date));

        summary.push_str("**Key Points:**\n");
        for point in &call.key_points {
            summary.push_str(&format!("- {point}\n"));
        }

        let outlook = if call.outlook.is_empty() {
            "N/A"
        } else {
            call.outlook.as_str()
        };
        summary.push_str(&format!("\n**Outlook:** {outlook}\n\n"));

        if !call.management_quotes.is_empty() {
            summary.push_str("**Management Quotes:**\n");
            for quote in &call.management_quotes {
                summary.push_str(&format!("> {quote}\n\n"));
            }
        }

        summary.push_str("---\n\n");
    }

    summary.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_store, tsmc_calls};
    use chainlens_core::model::CompanyNode;

    fn resolved(company_id: &str) -> AnalysisState {
        AnalysisState::new("query")
            .merge(StateUpdate::Resolution {
                company_id: company_id.to_string(),
                basic_info: CompanyNode::unknown(company_id),
            })
            .unwrap()
    }

    #[test]
    fn test_summary_layout() {
        let summary = format_earnings_call_summary(&tsmc_calls()[..1]);
        assert!(summary.starts_with("## 法說會重點摘要\n\n### TSMC 2025 Q3 Earnings Conference (2025-10-16)"));
        assert!(summary.contains("**Key Points:**\n- Revenue up 30.3% YoY\n- HPC reached 57% of revenue"));
        assert!(summary.contains("**Outlook:** Q4 revenue expected"));
        assert!(summary.contains("**Management Quotes:**\n> AI demand continues to be very strong."));
        assert!(summary.ends_with("---"));
    }

    #[tokio::test]
    async fn test_stage_respects_limit() {
        let stage = EarningsCallStage::new(Arc::new(fixture_store()), 2);
        let StateUpdate::EarningsCall(SectionText::Content(text)) = stage.run(&resolved("2330")).await
        else {
            panic!("expected earnings call content");
        };
        assert!(text.contains("2025 Q3"));
        assert!(text.contains("2025 Q2"));
        assert!(!text.contains("2025 Q1"));
        // Second call has no quotes
        assert_eq!(text.matches("**Management Quotes:**").count(), 1);
    }

    #[tokio::test]
    async fn test_stage_without_calls() {
        let stage = EarningsCallStage::new(Arc::new(fixture_store()), 2);
        let update = stage.run(&resolved("AAPL")).await;
        assert_eq!(
            update,
            StateUpdate::EarningsCall(SectionText::Unavailable(
                "No earnings call data available for company AAPL.".to_string()
            ))
        );
    }
}
