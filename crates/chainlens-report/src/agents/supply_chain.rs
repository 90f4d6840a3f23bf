//! Supply-chain analysis stage
//!
//! Reads the company's relations from the graph and asks the generation
//! backend for a risk narrative. Any backend failure, or an empty answer,
//! falls back to [`fallback_analysis`].

use super::risk::fallback_analysis;
use super::target_company;
use crate::prompts::{SUPPLY_CHAIN_ANALYST, supply_chain_analysis_prompt};
use crate::store::RelationshipGraph;
use async_trait::async_trait;
use chainlens_core::model::{CompanyNode, RelatedCompanies, RelatedCompany, SupplyChainAnalysis};
use chainlens_core::{AnalysisState, Stage, StateUpdate};
use chainlens_llm::TextGenerator;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Serialize)]
struct CompanyPayload<'a> {
    name: &'a str,
    country: &'a str,
    category: &'a str,
    role: &'a str,
    tags: &'a [String],
}

#[derive(Serialize)]
struct RelationPayload<'a> {
    name: &'a str,
    country: &'a str,
    category: &'a str,
    tags: &'a [String],
    relationship: Option<&'a str>,
}

#[derive(Serialize)]
struct PartnerPayload<'a> {
    name: &'a str,
    country: &'a str,
    category: &'a str,
    relationship: Option<&'a str>,
}

#[derive(Serialize)]
struct CompetitorPayload<'a> {
    name: &'a str,
    country: &'a str,
    tags: &'a [String],
}

/// Structured data handed to the backend
#[derive(Serialize)]
struct SupplyChainPayload<'a> {
    company: CompanyPayload<'a>,
    customers: Vec<RelationPayload<'a>>,
    suppliers: Vec<RelationPayload<'a>>,
    partners: Vec<PartnerPayload<'a>>,
    competitors: Vec<CompetitorPayload<'a>>,
}

impl<'a> SupplyChainPayload<'a> {
    fn new(company: &'a CompanyNode, related: &'a RelatedCompanies) -> Self {
        let relation = |r: &'a RelatedCompany| RelationPayload {
            name: &r.company.name,
            country: &r.company.country,
            category: &r.company.category,
            tags: &r.company.tags,
            relationship: r.relationship_description.as_deref(),
        };

        Self {
            company: CompanyPayload {
                name: &company.name,
                country: &company.country,
                category: &company.category,
                role: company.role.as_str(),
                tags: &company.tags,
            },
            customers: related.customers.iter().map(relation).collect(),
            suppliers: related.suppliers.iter().map(relation).collect(),
            partners: related
                .partners
                .iter()
                .map(|r| PartnerPayload {
                    name: &r.company.name,
                    country: &r.company.country,
                    category: &r.company.category,
                    relationship: r.relationship_description.as_deref(),
                })
                .collect(),
            competitors: related
                .competitors
                .iter()
                .map(|r| CompetitorPayload {
                    name: &r.company.name,
                    country: &r.company.country,
                    tags: &r.company.tags,
                })
                .collect(),
        }
    }
}

/// Pretty-printed JSON describing the company and its relations
pub fn supply_chain_payload(
    company: &CompanyNode,
    related: &RelatedCompanies,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SupplyChainPayload::new(company, related))
}

pub struct SupplyChainStage {
    graph: Arc<dyn RelationshipGraph>,
    generator: Arc<dyn TextGenerator>,
    temperature: f32,
}

impl SupplyChainStage {
    pub fn new(
        graph: Arc<dyn RelationshipGraph>,
        generator: Arc<dyn TextGenerator>,
        temperature: f32,
    ) -> Self {
        Self {
            graph,
            generator,
            temperature,
        }
    }

    /// Backend narrative, or the rule-based one when the backend gives nothing usable
    async fn narrative(&self, company: &CompanyNode, related: &RelatedCompanies) -> String {
        let payload = match supply_chain_payload(company, related) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize supply-chain payload: {}", e);
                return fallback_analysis(company, related);
            }
        };

        match self
            .generator
            .generate(
                SUPPLY_CHAIN_ANALYST,
                &supply_chain_analysis_prompt(&payload),
                self.temperature,
            )
            .await
        {
            Ok(text) if !text.trim().is_empty() => {
                info!("Generated supply-chain narrative for {}", company.id);
                text
            }
            Ok(_) => {
                warn!("Empty supply-chain narrative, using rule-based analysis");
                fallback_analysis(company, related)
            }
            Err(e) => {
                warn!("Supply-chain generation failed, using rule-based analysis: {}", e);
                fallback_analysis(company, related)
            }
        }
    }
}

#[async_trait]
impl Stage for SupplyChainStage {
    async fn run(&self, state: &AnalysisState) -> StateUpdate {
        let company_id = target_company(state);
        info!("Analyzing supply chain of {}", company_id);

        let Some(company) = self.graph.get_node(company_id).cloned() else {
            warn!("{} is not in the relationship graph", company_id);
            return StateUpdate::SupplyChain(SupplyChainAnalysis::unavailable(company_id));
        };

        let related = self.graph.get_related(company_id);
        let summary = self.narrative(&company, &related).await;

        StateUpdate::SupplyChain(SupplyChainAnalysis { summary, related })
    }

    fn name(&self) -> &str {
        "supply_chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockGenerator, failing_generator, fixed_generator, fixture_graph, unused_generator};
    use chainlens_core::model::CompanyNode;

    fn resolved(company_id: &str) -> AnalysisState {
        AnalysisState::new("query")
            .merge(StateUpdate::Resolution {
                company_id: company_id.to_string(),
                basic_info: CompanyNode::unknown(company_id),
            })
            .unwrap()
    }

    fn stage(generator: MockGenerator) -> SupplyChainStage {
        SupplyChainStage::new(Arc::new(fixture_graph()), Arc::new(generator), 0.2)
    }

    #[test]
    fn test_payload_shape() {
        let graph = fixture_graph();
        let company = graph.get_node("2330").unwrap();
        let payload = supply_chain_payload(company, &graph.get_related("2330")).unwrap();

        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["company"]["name"], "TSMC");
        assert_eq!(value["company"]["role"], "Self");
        assert_eq!(value["customers"].as_array().unwrap().len(), 3);
        assert_eq!(value["suppliers"][0]["relationship"], "EUV lithography");
        assert!(value["partners"][0].get("tags").is_none());
        assert!(value["competitors"][0].get("category").is_none());
        assert_eq!(value["competitors"][0]["name"], "Samsung");
        // Pretty-printed
        assert!(payload.contains("\n  \"company\""));
    }

    #[tokio::test]
    async fn test_backend_narrative_is_used() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .withf(|system, user, temperature| {
                system == SUPPLY_CHAIN_ANALYST
                    && user.contains("\"name\": \"TSMC\"")
                    && (*temperature - 0.2).abs() < f32::EPSILON
            })
            .times(1)
            .returning(|_, _, _| Ok("## AI narrative".to_string()));

        let StateUpdate::SupplyChain(analysis) = stage(generator).run(&resolved("2330")).await else {
            panic!("expected SupplyChain");
        };
        assert_eq!(analysis.summary, "## AI narrative");
        assert_eq!(analysis.related.customers.len(), 3);
        assert_eq!(analysis.related.competitors.len(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back() {
        let StateUpdate::SupplyChain(analysis) =
            stage(failing_generator()).run(&resolved("2330")).await
        else {
            panic!("expected SupplyChain");
        };
        assert!(analysis.summary.starts_with("## 供應鏈分析：TSMC"));
        assert!(analysis.summary.contains("主要客戶集中於"));
    }

    #[tokio::test]
    async fn test_blank_answer_falls_back() {
        let StateUpdate::SupplyChain(analysis) =
            stage(fixed_generator("  \n ")).run(&resolved("2330")).await
        else {
            panic!("expected SupplyChain");
        };
        assert!(analysis.summary.contains("### 風險分析"));
    }

    #[tokio::test]
    async fn test_unknown_company_skips_backend() {
        let StateUpdate::SupplyChain(analysis) =
            stage(unused_generator()).run(&resolved("TSLA")).await
        else {
            panic!("expected SupplyChain");
        };
        assert_eq!(
            analysis.summary,
            "No supply chain data available for company TSLA."
        );
        assert!(analysis.related.is_empty());
    }
}
