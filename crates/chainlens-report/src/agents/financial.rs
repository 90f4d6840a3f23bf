//! Financial retrieval stage

use super::target_company;
use crate::store::FinancialStore;
use async_trait::async_trait;
use chainlens_core::model::{FinanceResults, FinancialRecord, Metric, RevenueShare};
use chainlens_core::{AnalysisState, Stage, StateUpdate};
use comfy_table::{Table, presets};
use std::sync::Arc;
use tracing::{info, warn};

const NOT_AVAILABLE: &str = "N/A";

/// Looks up the latest financial record and renders a Markdown summary
pub struct FinancialStage {
    store: Arc<dyn FinancialStore>,
}

impl FinancialStage {
    pub fn new(store: Arc<dyn FinancialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Stage for FinancialStage {
    async fn run(&self, state: &AnalysisState) -> StateUpdate {
        let company_id = target_company(state);

        let results = match self.store.get_financial_record(company_id).await {
            Some(record) => {
                info!(
                    "Financial record found for {} ({:?} {:?})",
                    company_id, record.fiscal_year, record.fiscal_quarter
                );
                FinanceResults {
                    summary: format_financial_summary(&record),
                    raw_data: Some(record),
                }
            }
            None => {
                warn!("No financial record for {}", company_id);
                FinanceResults {
                    raw_data: None,
                    summary: format!("No financial data available for company {company_id}."),
                }
            }
        };

        StateUpdate::Financial(results)
    }

    fn name(&self) -> &str {
        "financial"
    }
}

/// Markdown summary of a financial record
pub fn format_financial_summary(record: &FinancialRecord) -> String {
    let period = format!(
        "{} {}",
        record.fiscal_year.as_deref().unwrap_or(NOT_AVAILABLE),
        record.fiscal_quarter.as_deref().unwrap_or(NOT_AVAILABLE)
    );

    let mut table = Table::new();
    table.load_preset(presets::ASCII_MARKDOWN);
    table.set_header(vec!["Metric", "Value", "Change"]);
    table.add_row(vec![
        "Revenue".to_string(),
        amount(record.revenue.as_ref()),
        change("YoY", record.revenue.as_ref().and_then(|m| m.yoy_growth.as_deref())),
    ]);
    table.add_row(vec![
        "Gross Margin".to_string(),
        percentage(record.gross_margin.as_ref()),
        change(
            "QoQ",
            record.gross_margin.as_ref().and_then(|m| m.qoq_change.as_deref()),
        ),
    ]);
    table.add_row(vec![
        "Operating Margin".to_string(),
        percentage(record.operating_margin.as_ref()),
        "-".to_string(),
    ]);
    table.add_row(vec![
        "Net Income".to_string(),
        amount(record.net_income.as_ref()),
        change(
            "YoY",
            record.net_income.as_ref().and_then(|m| m.yoy_growth.as_deref()),
        ),
    ]);
    table.add_row(vec![
        "EPS".to_string(),
        record.eps.as_ref().map_or_else(
            || NOT_AVAILABLE.to_string(),
            |eps| format!("{} {}", eps.value, eps.unit_or_empty()).trim_end().to_string(),
        ),
        "-".to_string(),
    ]);

    let mut summary = format!(
        "**{} Financial Summary ({period})**\n\n{table}\n\n",
        record.company_name
    );

    push_shares(&mut summary, "Revenue by Platform", &record.revenue_by_platform);
    summary.push('\n');
    push_shares(&mut summary, "Revenue by Technology", &record.revenue_by_technology);

    if let Some(capex) = &record.capex_guidance {
        let year = capex.year.as_deref().unwrap_or("2026");
        summary.push_str(&format!("\n**{year} CapEx Guidance:** {} USD\n", capex.range));
    }

    summary.trim().to_string()
}

fn push_shares(summary: &mut String, heading: &str, shares: &[RevenueShare]) {
    summary.push_str(&format!("**{heading}:**\n"));
    for share in shares {
        summary.push_str(&format!("- {}: {}\n", share.segment, share.share));
    }
}

fn amount(metric: Option<&Metric>) -> String {
    metric.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |m| {
            format!("{} {}", with_thousands(m.value), m.unit_or_empty())
                .trim_end()
                .to_string()
        },
    )
}

fn percentage(metric: Option<&Metric>) -> String {
    metric.map_or_else(|| NOT_AVAILABLE.to_string(), |m| format!("{}%", m.value))
}

fn change(label: &str, value: Option<&str>) -> String {
    format!("{label} {}", value.unwrap_or(NOT_AVAILABLE))
}

/// Group the integer part with commas, keeping up to two decimals
pub fn with_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (integer, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction = fraction.trim_end_matches('0');
    let sign = if value < 0.0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}
