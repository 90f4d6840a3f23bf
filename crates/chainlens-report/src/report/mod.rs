//! Report synthesis
//!
//! The last stage assembles every section into one Markdown document. It
//! always produces a report: a rendering failure becomes an error document
//! and `validation_status` is set to `true` either way.

mod sections;
mod table;

pub use sections::{
    MAX_HORIZONTAL_ENTRIES, MAX_VERTICAL_ENTRIES, NO_COMPETITORS, NO_CUSTOMERS, NO_PARTNERS,
    NO_SUPPLIERS, latest_period, supply_chain_section,
};
pub use table::{DEGRADED_FOOTNOTE, FinancialTable, MetricRow, TWD_PER_USD};

use crate::error::{ReportError, Result};
use crate::prompts::{
    EARNINGS_KEY_POINTS, NEWS_HIGHLIGHTS, earnings_key_points_prompt, news_highlights_prompt,
};
use crate::store::QuarterlyStore;
use async_trait::async_trait;
use chainlens_core::{AnalysisState, SectionText, Stage, StateUpdate};
use chainlens_llm::TextGenerator;
use chrono::{Local, NaiveDate};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{error, info, warn};

const NO_EARNINGS_CALLS: &str = "*No earnings call data available.*";
const NO_NEWS: &str = "*No recent news available.*";
const FOOTER: &str = "*此報告由 Multi-Agent System 自動生成，結合結構化數據與 AI 分析，僅供參考。*";

/// Final stage: renders the analysis report
pub struct ReportSynthesizer {
    quarterly: Arc<dyn QuarterlyStore>,
    generator: Arc<dyn TextGenerator>,
    key_points_temperature: f32,
    news_highlights_temperature: f32,
    report_date: Option<NaiveDate>,
}

impl ReportSynthesizer {
    pub fn new(quarterly: Arc<dyn QuarterlyStore>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            quarterly,
            generator,
            key_points_temperature: 0.2,
            news_highlights_temperature: 0.1,
            report_date: None,
        }
    }

    pub fn with_temperatures(mut self, key_points: f32, news_highlights: f32) -> Self {
        self.key_points_temperature = key_points;
        self.news_highlights_temperature = news_highlights;
        self
    }

    /// Fix the creation date instead of using today's local date
    pub fn with_report_date(mut self, date: NaiveDate) -> Self {
        self.report_date = Some(date);
        self
    }

    /// Render the full report for a populated state
    pub async fn render(&self, state: &AnalysisState) -> Result<String> {
        let company_id = state
            .company_id()
            .ok_or_else(|| ReportError::RenderError("company has not been resolved".to_string()))?;
        let company_name = state.basic_info().map_or("Unknown", |info| info.name.as_str());

        let record = state.finance_results().and_then(|f| f.raw_data.as_ref());
        let dataset = self.quarterly.get_quarterly_dataset(company_id).await;
        let table = FinancialTable::build(record, dataset.as_ref(), company_name);
        let period = latest_period(record, dataset.as_ref());

        let key_points = self.key_points(state.earnings_call_summary()).await;
        let news = self.news_highlights(state.news_summary()).await;
        let supply_chain = supply_chain_section(state.supply_chain_analysis())?;

        let date = self
            .report_date
            .unwrap_or_else(|| Local::now().date_naive())
            .format("%Y/%m/%d");

        let mut report = String::new();
        write!(
            report,
            "# AI Supply Chain Analysis Report\n\n\
             **Create date:** {date}\n\n\
             ---\n\n\
             **Company:** {company_name}\n\n\
             **Latest Earnings Call (Calendar Year):** {period}\n\n\
             ---\n\n\
             ## Financial Status:\n\n\
             {table}\n\n\
             ---\n\n"
        )?;
        write!(
            report,
            "## AI Analysis:\n\n\
             ### ● Latest Earnings Call Transcript - QA Session Summary:\n\n\
             <5 key points>\n\n\
             {key_points}\n\n\
             ---\n\n\
             ### ● News Summary:\n\n\
             <Latest key news within 30 days, around 20 news>\n\n\
             {news}\n\n\
             ---\n\n\
             ### ● Supply Chain Analysis:\n\n\
             {supply_chain}\n\n\
             ---\n\n\
             {FOOTER}\n"
        )?;

        Ok(report)
    }

    /// Five key points from the earnings summary, or the summary itself on failure
    async fn key_points(&self, summary: Option<&SectionText>) -> String {
        let Some(text) = summary.and_then(SectionText::content) else {
            return NO_EARNINGS_CALLS.to_string();
        };
        self.condense(
            "earnings key points",
            EARNINGS_KEY_POINTS,
            &earnings_key_points_prompt(text),
            self.key_points_temperature,
            text,
        )
        .await
    }

    async fn news_highlights(&self, summary: Option<&SectionText>) -> String {
        let Some(text) = summary.and_then(SectionText::content) else {
            return NO_NEWS.to_string();
        };
        self.condense(
            "news highlights",
            NEWS_HIGHLIGHTS,
            &news_highlights_prompt(text),
            self.news_highlights_temperature,
            text,
        )
        .await
    }

    async fn condense(
        &self,
        what: &str,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        original: &str,
    ) -> String {
        match self
            .generator
            .generate(system_prompt, user_prompt, temperature)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Empty {} from backend, keeping the summary", what);
                original.to_string()
            }
            Err(e) => {
                warn!("Failed to generate {}, keeping the summary: {}", what, e);
                original.to_string()
            }
        }
    }
}

#[async_trait]
impl Stage for ReportSynthesizer {
    async fn run(&self, state: &AnalysisState) -> StateUpdate {
        info!("Generating report");

        let final_report = match self.render(state).await {
            Ok(report) => {
                info!("Report generated ({} bytes)", report.len());
                report
            }
            Err(e) => {
                error!("Report generation failed: {}", e);
                format!("Error generating report: {e}")
            }
        };

        StateUpdate::Report {
            final_report,
            validation_status: true,
        }
    }

    fn name(&self) -> &str {
        "reporter"
    }
}
