//! Shared fixtures for unit tests

use crate::store::{FileKnowledgeStore, KnowledgeSources, SupplyChainGraph};
use async_trait::async_trait;
use chainlens_core::model::{EarningsCall, FinancialRecord, NewsArticle, QuarterlyDataset};
use chainlens_llm::{LLMError, TextGenerator};
use mockall::mock;
use serde_json::json;
use std::sync::Arc;

mock! {
    pub Generator {}

    #[async_trait]
    impl TextGenerator for Generator {
        async fn generate(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            temperature: f32,
        ) -> chainlens_llm::Result<String>;
    }
}

/// Generator whose every call fails as if retries were exhausted
pub fn failing_generator() -> MockGenerator {
    let mut generator = MockGenerator::new();
    generator.expect_generate().returning(|_, _, _| {
        Err(LLMError::RetriesExhausted {
            attempts: 3,
            last_error: "API request failed: connection refused".to_string(),
        })
    });
    generator
}

/// Generator that answers every call with `text`
pub fn fixed_generator(text: &'static str) -> MockGenerator {
    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .returning(move |_, _, _| Ok(text.to_string()));
    generator
}

/// Generator that must not be called
pub fn unused_generator() -> MockGenerator {
    let mut generator = MockGenerator::new();
    generator.expect_generate().never();
    generator
}

pub fn fixture_graph() -> SupplyChainGraph {
    SupplyChainGraph::from_json(
        &json!({
            "nodes": [
                {"id": "2330", "name": "TSMC", "country": "Taiwan", "category": "Foundry", "role": "Self", "tags": ["3nm", "CoWoS"]},
                {"id": "AAPL", "name": "Apple", "country": "USA", "category": "Consumer Electronics", "role": "Customer", "tags": ["Mobile", "M-series"]},
                {"id": "NVDA", "name": "NVIDIA", "country": "USA", "category": "Fabless", "role": "Customer", "tags": ["AI", "GPU"]},
                {"id": "AMD", "name": "AMD", "country": "USA", "category": "Fabless", "role": "Customer", "tags": ["HPC", "CPU"]},
                {"id": "ASML", "name": "ASML", "country": "Netherlands", "category": "Equipment", "role": "Supplier", "tags": ["EUV"]},
                {"id": "AMAT", "name": "Applied Materials", "country": "USA", "category": "Equipment", "role": "Supplier", "tags": ["Deposition"]},
                {"id": "ARM", "name": "Arm", "country": "UK", "category": "IP", "role": "Partner", "tags": []},
                {"id": "5930", "name": "Samsung", "country": "South Korea", "category": "Foundry", "role": "Competitor", "tags": ["GAA"]},
                {"id": "ISOL", "name": "Isolated Co", "country": "Japan", "category": "Materials", "role": "Supplier", "tags": []}
            ],
            "edges": [
                {"source": "AAPL", "target": "2330", "relation": "Client", "description": "A-series and M-series SoCs"},
                {"source": "NVDA", "target": "2330", "relation": "Client", "description": "AI accelerators on CoWoS"},
                {"source": "AMD", "target": "2330", "relation": "Client", "description": "EPYC and Instinct"},
                {"source": "ASML", "target": "2330", "relation": "Supplier", "description": "EUV lithography"},
                {"source": "AMAT", "target": "2330", "relation": "Supplier", "description": "Deposition tools"},
                {"source": "2330", "target": "ARM", "relation": "Partner", "description": "Design enablement"},
                {"source": "2330", "target": "NVDA", "relation": "Partner", "description": "Advanced packaging"}
            ]
        })
        .to_string(),
    )
    .unwrap()
}

pub fn tsmc_record() -> FinancialRecord {
    serde_json::from_value(json!({
        "company_name": "TSMC",
        "fiscal_year": "2025",
        "fiscal_quarter": "Q3",
        "revenue": {"value": 989_920_000_000.0, "unit": "TWD", "yoy_growth": "+30.3%", "qoq_change": "+6.0%"},
        "gross_margin": {"value": 59.5, "unit": "%", "qoq_change": "+0.9pp"},
        "operating_margin": {"value": 50.6, "unit": "%"},
        "net_income": {"value": 452_300_000_000.0, "unit": "TWD", "yoy_growth": "+39.1%"},
        "eps": {"value": 17.44, "unit": "TWD"},
        "revenue_by_platform": [
            {"segment": "HPC", "share": "57%"},
            {"segment": "Smartphone", "share": "30%"}
        ],
        "revenue_by_technology": [
            {"segment": "3nm", "share": "23%"},
            {"segment": "5nm", "share": "37%"}
        ],
        "capex_guidance": {"year": "2026", "range": "40-42B"}
    }))
    .unwrap()
}

pub fn nvda_record() -> FinancialRecord {
    serde_json::from_value(json!({
        "company_name": "NVIDIA",
        "fiscal_year": "2026",
        "fiscal_quarter": "Q2",
        "revenue": {"value": 46_743_000_000.0, "unit": "USD", "yoy_growth": "+56%"},
        "gross_margin": {"value": 72.4, "unit": "%"}
    }))
    .unwrap()
}

pub fn nvda_quarterly() -> QuarterlyDataset {
    serde_json::from_value(json!({
        "company_name": "NVIDIA",
        "currency": "USD",
        "quarterly_data": {
            "2024Q3": {"revenue": {"value": 35_082_000_000.0, "unit": "USD"}, "gross_margin": {"value": 74.6}, "doi_days": {"value": 118.0}},
            "2024Q4": {"revenue": {"value": 39_331_000_000.0, "unit": "USD"}, "gross_margin": {"value": 73.0}, "doi_days": {"value": 110.5}},
            "2025Q1": {"revenue": {"value": 44_062_000_000.0, "unit": "USD"}, "gross_margin": {"value": 60.5}, "doi_days": {"value": 92.0}},
            "2025Q3": {"revenue": {"value": 46_743_000_000.0, "unit": "USD"}, "gross_margin": {"value": 72.4}, "doi_days": {"value": 117.25}}
        },
        "latest_changes": {
            "revenue_qoq": "+6.1%",
            "revenue_yoy": "+33.2%",
            "gross_margin_qoq": "+11.9pp"
        },
        "latest_quarter": {"fiscal_year": "FY2026", "fiscal_quarter": "Q2"}
    }))
    .unwrap()
}

pub fn tsmc_calls() -> Vec<EarningsCall> {
    vec![
        EarningsCall {
            title: "TSMC 2025 Q3 Earnings Conference".to_string(),
            date: "2025-10-16".to_string(),
            key_points: vec![
                "Revenue up 30.3% YoY".to_string(),
                "HPC reached 57% of revenue".to_string(),
            ],
            outlook: "Q4 revenue expected between USD 32.2B and 33.4B".to_string(),
            management_quotes: vec!["AI demand continues to be very strong.".to_string()],
        },
        EarningsCall {
            title: "TSMC 2025 Q2 Earnings Conference".to_string(),
            date: "2025-07-17".to_string(),
            key_points: vec!["Gross margin 58.6%".to_string()],
            outlook: "Full-year growth raised to mid-30s percent".to_string(),
            management_quotes: vec![],
        },
        EarningsCall {
            title: "TSMC 2025 Q1 Earnings Conference".to_string(),
            date: "2025-04-17".to_string(),
            key_points: vec!["N2 on track".to_string()],
            outlook: "Stable".to_string(),
            management_quotes: vec![],
        },
    ]
}

pub fn fixture_news() -> Vec<NewsArticle> {
    serde_json::from_value(json!([
        {"title": "TSMC raises 2025 outlook", "date": "2025-10-16", "source": "Reuters", "sentiment": "positive",
         "summary": "Full-year growth guidance lifted on AI demand.", "related_companies": ["2330", "NVDA"]},
        {"title": "Tariff uncertainty weighs on chip stocks", "date": "2025-10-10", "source": "Bloomberg", "sentiment": "negative",
         "summary": "Section 232 review adds uncertainty.", "related_companies": ["2330"]},
        {"title": "Apple supplier roundup", "date": "2025-10-05", "source": "DigiTimes", "sentiment": "mixed",
         "summary": "Component orders steady.", "related_companies": ["AAPL", "2330"]},
        {"title": "NVIDIA ships Blackwell Ultra", "date": "2025-09-30", "source": "CNBC", "sentiment": "neutral",
         "summary": "Volume shipments begin.", "related_companies": ["NVDA"]}
    ]))
    .unwrap()
}

/// Store with TSMC (no quarterly series) and NVIDIA (with quarterly series)
pub fn fixture_store() -> FileKnowledgeStore {
    FileKnowledgeStore::default()
        .with_graph(fixture_graph())
        .with_financial_record("2330", tsmc_record())
        .with_financial_record("NVDA", nvda_record())
        .with_quarterly_dataset("NVDA", nvda_quarterly())
        .with_earnings_calls("2330", tsmc_calls())
        .with_news(fixture_news())
}

pub fn fixture_sources() -> KnowledgeSources {
    KnowledgeSources::from_store(Arc::new(fixture_store()))
}
