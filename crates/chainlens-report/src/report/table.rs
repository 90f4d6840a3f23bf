//! Financial status table
//!
//! Five consecutive calendar quarters plus the latest QoQ / YoY deltas, for
//! revenue (USD billions), gross margin and days of inventory. When only the
//! latest-quarter record is available the table is degraded to a single
//! filled column and carries a footnote.

use chainlens_core::model::{
    CalendarQuarter, FinancialRecord, Metric, QuarterMetrics, QuarterlyDataset,
};
use comfy_table::{Table, presets};
use std::fmt;

/// Fixed conversion rate applied to TWD revenue
pub const TWD_PER_USD: f64 = 31.0;

/// Number of calendar quarters shown
pub const QUARTER_WINDOW: usize = 5;

pub const MISSING_VALUE: &str = "-";
pub const MISSING_DELTA: &str = "X";

pub const DEGRADED_FOOTNOTE: &str =
    "*Note: Historical quarterly data not available. Only latest quarter shown.*";

/// Last calendar quarter of the degraded table
///
/// A record's fiscal period is not a calendar quarter, so the degraded
/// window is fixed and the record fills its final column.
const DEGRADED_WINDOW_END: (i32, u8) = (2025, 3);

/// One metric row: label, one cell per quarter, then QoQ and YoY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRow {
    pub label: String,
    pub quarters: Vec<String>,
    pub qoq: String,
    pub yoy: String,
}

impl MetricRow {
    fn empty(label: String, width: usize) -> Self {
        Self {
            label,
            quarters: vec![MISSING_VALUE.to_string(); width],
            qoq: MISSING_DELTA.to_string(),
            yoy: MISSING_DELTA.to_string(),
        }
    }

    fn cells(&self) -> Vec<&str> {
        std::iter::once(self.label.as_str())
            .chain(self.quarters.iter().map(String::as_str))
            .chain([self.qoq.as_str(), self.yoy.as_str()])
            .collect()
    }
}

/// Rendered-ready financial status table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialTable {
    quarters: Vec<CalendarQuarter>,
    revenue: MetricRow,
    gross_margin: MetricRow,
    doi: MetricRow,
    footnote: Option<&'static str>,
}

impl FinancialTable {
    /// Build from the detailed dataset when it has data, else from the record
    ///
    /// `fallback_name` labels the revenue row when neither source is present.
    pub fn build(
        record: Option<&FinancialRecord>,
        dataset: Option<&QuarterlyDataset>,
        fallback_name: &str,
    ) -> Self {
        match dataset.and_then(|d| d.most_recent_quarter().map(|latest| (d, latest))) {
            Some((dataset, latest)) => Self::from_dataset(dataset, latest),
            None => Self::degraded(record, fallback_name),
        }
    }

    fn from_dataset(dataset: &QuarterlyDataset, latest: CalendarQuarter) -> Self {
        let quarters = latest.window_ending(QUARTER_WINDOW);
        let changes = &dataset.latest_changes;

        Self {
            revenue: MetricRow {
                label: revenue_label(&dataset.company_name),
                quarters: quarter_cells(dataset, &quarters, |m| {
                    m.revenue
                        .as_ref()
                        .map(|r| format_revenue(r, &dataset.currency))
                }),
                qoq: delta(changes.revenue_qoq.as_deref()),
                yoy: delta(changes.revenue_yoy.as_deref()),
            },
            gross_margin: MetricRow {
                label: GROSS_MARGIN_LABEL.to_string(),
                quarters: quarter_cells(dataset, &quarters, |m| {
                    m.gross_margin.as_ref().map(|g| format!("{:.2}", g.value))
                }),
                qoq: delta(changes.gross_margin_qoq.as_deref()),
                yoy: delta(changes.gross_margin_yoy.as_deref()),
            },
            doi: MetricRow {
                label: DOI_LABEL.to_string(),
                quarters: quarter_cells(dataset, &quarters, |m| {
                    m.doi_days.as_ref().map(|d| format!("{:.1}", d.value))
                }),
                qoq: delta(changes.doi_qoq.as_deref()),
                yoy: delta(changes.doi_yoy.as_deref()),
            },
            quarters,
            footnote: None,
        }
    }

    fn degraded(record: Option<&FinancialRecord>, fallback_name: &str) -> Self {
        let quarters = CalendarQuarter::new(DEGRADED_WINDOW_END.0, DEGRADED_WINDOW_END.1)
            .map(|latest| latest.window_ending(QUARTER_WINDOW))
            .unwrap_or_default();
        let width = quarters.len();

        let name = record.map_or(fallback_name, |r| r.company_name.as_str());
        let mut revenue = MetricRow::empty(revenue_label(name), width);
        let mut gross_margin = MetricRow::empty(GROSS_MARGIN_LABEL.to_string(), width);
        let doi = MetricRow::empty(DOI_LABEL.to_string(), width);

        if let Some(record) = record {
            if let Some(metric) = &record.revenue {
                fill_latest(&mut revenue, format_revenue(metric, "USD"), metric);
            }
            if let Some(metric) = &record.gross_margin {
                fill_latest(&mut gross_margin, format!("{:.2}", metric.value), metric);
            }
        }

        Self {
            quarters,
            revenue,
            gross_margin,
            doi,
            footnote: Some(DEGRADED_FOOTNOTE),
        }
    }

    pub fn quarters(&self) -> &[CalendarQuarter] {
        &self.quarters
    }

    /// Metric rows in display order
    pub fn rows(&self) -> [&MetricRow; 3] {
        [&self.revenue, &self.gross_margin, &self.doi]
    }

    pub fn footnote(&self) -> Option<&str> {
        self.footnote
    }

    pub fn is_degraded(&self) -> bool {
        self.footnote.is_some()
    }

    fn table(&self) -> Table {
        // Group header, then the quarter labels as the first body row
        let mut header = vec!["Company Financial Indices".to_string(), "Calendar YQ".to_string()];
        header.extend(std::iter::repeat_n(String::new(), self.quarters.len().saturating_sub(1)));
        header.extend(["Latest".to_string(), String::new()]);

        let mut labels = vec![String::new()];
        labels.extend(self.quarters.iter().map(ToString::to_string));
        labels.extend(["QoQ".to_string(), "YoY".to_string()]);

        let mut table = Table::new();
        table.load_preset(presets::ASCII_MARKDOWN);
        table.set_header(header);
        table.add_row(labels);
        for row in self.rows() {
            table.add_row(row.cells());
        }
        table
    }
}

impl fmt::Display for FinancialTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())?;
        if let Some(footnote) = self.footnote {
            write!(f, "\n\n{footnote}")?;
        }
        Ok(())
    }
}

const GROSS_MARGIN_LABEL: &str = "Gross Margin (%)";
const DOI_LABEL: &str = "DOI (days)";

fn revenue_label(company_name: &str) -> String {
    format!("{company_name} - Revenue (USD B)")
}

/// Revenue in USD billions; the metric's own unit wins over `default_currency`
fn format_revenue(metric: &Metric, default_currency: &str) -> String {
    let currency = metric.unit.as_deref().unwrap_or(default_currency);
    let usd = if currency.eq_ignore_ascii_case("TWD") {
        metric.value / TWD_PER_USD
    } else {
        metric.value
    };
    format!("{:.2}", usd / 1_000_000_000.0)
}

fn quarter_cells(
    dataset: &QuarterlyDataset,
    quarters: &[CalendarQuarter],
    value: impl Fn(&QuarterMetrics) -> Option<String>,
) -> Vec<String> {
    quarters
        .iter()
        .map(|&quarter| {
            dataset
                .quarter(quarter)
                .and_then(&value)
                .unwrap_or_else(|| MISSING_VALUE.to_string())
        })
        .collect()
}

fn delta(value: Option<&str>) -> String {
    value.unwrap_or(MISSING_DELTA).to_string()
}

fn fill_latest(row: &mut MetricRow, value: String, metric: &Metric) {
    if let Some(last) = row.quarters.last_mut() {
        *last = value;
    }
    if let Some(qoq) = &metric.qoq_change {
        row.qoq.clone_from(qoq);
    }
    if let Some(yoy) = &metric.yoy_growth {
        row.yoy.clone_from(yoy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{nvda_quarterly, nvda_record, tsmc_record};

    fn labels(table: &FinancialTable) -> Vec<String> {
        table.quarters().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_detailed_table() {
        let table = FinancialTable::build(Some(&nvda_record()), Some(&nvda_quarterly()), "NVIDIA");

        assert!(!table.is_degraded());
        assert_eq!(labels(&table), vec!["2024Q3", "2024Q4", "2025Q1", "2025Q2", "2025Q3"]);

        let [revenue, gross_margin, doi] = table.rows();
        assert_eq!(revenue.label, "NVIDIA - Revenue (USD B)");
        assert_eq!(revenue.quarters, vec!["35.08", "39.33", "44.06", "-", "46.74"]);
        assert_eq!((revenue.qoq.as_str(), revenue.yoy.as_str()), ("+6.1%", "+33.2%"));

        assert_eq!(gross_margin.quarters[0], "74.60");
        assert_eq!(gross_margin.qoq, "+11.9pp");
        assert_eq!(gross_margin.yoy, "X");

        assert_eq!(doi.quarters[0], "118.0");
        assert_eq!(doi.quarters[3], "-");
        assert_eq!((doi.qoq.as_str(), doi.yoy.as_str()), ("X", "X"));
    }

    #[test]
    fn test_degraded_table_from_record() {
        let table = FinancialTable::build(Some(&tsmc_record()), None, "TSMC");

        assert!(table.is_degraded());
        assert_eq!(labels(&table).last().unwrap(), "2025Q3");

        let [revenue, gross_margin, doi] = table.rows();
        // 989.92B TWD / 31
        assert_eq!(revenue.quarters, vec!["-", "-", "-", "-", "31.93"]);
        assert_eq!((revenue.qoq.as_str(), revenue.yoy.as_str()), ("+6.0%", "+30.3%"));
        assert_eq!(gross_margin.quarters[4], "59.50");
        assert_eq!((gross_margin.qoq.as_str(), gross_margin.yoy.as_str()), ("+0.9pp", "X"));
        assert!(doi.quarters.iter().all(|cell| cell == "-"));

        let rendered = table.to_string();
        assert!(rendered.ends_with(DEGRADED_FOOTNOTE));
        assert!(rendered.contains("TSMC - Revenue (USD B)"));
    }

    #[test]
    fn test_table_without_any_data() {
        let table = FinancialTable::build(None, None, "Unknown");
        assert_eq!(labels(&table).last().unwrap(), "2025Q3");
        for row in table.rows() {
            assert!(row.quarters.iter().all(|cell| cell == "-"));
        }
        assert_eq!(table.rows()[0].label, "Unknown - Revenue (USD B)");
        assert_eq!(table.footnote(), Some(DEGRADED_FOOTNOTE));
    }

    #[test]
    fn test_dataset_without_quarters_degrades() {
        let mut dataset = nvda_quarterly();
        dataset.quarterly_data.clear();
        let table = FinancialTable::build(Some(&nvda_record()), Some(&dataset), "NVIDIA");
        assert!(table.is_degraded());
        assert_eq!(table.rows()[0].quarters[4], "46.74");
    }

    #[test]
    fn test_degraded_window_ignores_fiscal_period() {
        // Fiscal Q4 of a company whose year ends in September
        let mut record = nvda_record();
        record.company_name = "Apple".to_string();
        record.fiscal_year = Some("2025".to_string());
        record.fiscal_quarter = Some("Q4".to_string());

        let table = FinancialTable::build(Some(&record), None, "Apple");
        assert_eq!(labels(&table), vec!["2024Q3", "2024Q4", "2025Q1", "2025Q2", "2025Q3"]);
        assert!(!table.to_string().contains("2025Q4"));
    }

    #[test]
    fn test_rendered_table_has_three_metric_rows() {
        for table in [
            FinancialTable::build(Some(&nvda_record()), Some(&nvda_quarterly()), "NVIDIA"),
            FinancialTable::build(Some(&tsmc_record()), None, "TSMC"),
            FinancialTable::build(None, None, "Unknown"),
        ] {
            let rendered = table.to_string();
            let table_lines: Vec<&str> =
                rendered.lines().filter(|line| line.starts_with('|')).collect();
            // group header, separator, quarter labels, three metrics
            assert_eq!(table_lines.len(), 6);
            assert!(table_lines[0].contains("Company Financial Indices"));
            assert!(table_lines[0].contains("Calendar YQ"));
            assert!(table_lines[0].contains("Latest"));
            assert!(table_lines[2].contains("2025Q3"));
            assert!(table_lines[2].contains("QoQ"));
            assert!(table_lines[3].contains("Revenue (USD B)"));
        }
    }
}
