//! Financial records, the detailed quarterly dataset and calendar quarters

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A numeric metric tagged with its unit and the change strings reported alongside it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub value: f64,
    /// Currency or unit (e.g. "TWD", "USD", "%")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yoy_growth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qoq_change: Option<String>,
}

impl Metric {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_yoy(mut self, change: impl Into<String>) -> Self {
        self.yoy_growth = Some(change.into());
        self
    }

    pub fn with_qoq(mut self, change: impl Into<String>) -> Self {
        self.qoq_change = Some(change.into());
        self
    }

    pub fn unit_or_empty(&self) -> &str {
        self.unit.as_deref().unwrap_or_default()
    }
}

/// Share of revenue attributed to one platform or technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueShare {
    pub segment: String,
    pub share: String,
}

/// Capital expenditure guidance range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexGuidance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub range: String,
}

/// Latest-quarter financial record for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_quarter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_margin: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_margin: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_income: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eps: Option<Metric>,
    #[serde(default)]
    pub revenue_by_platform: Vec<RevenueShare>,
    #[serde(default)]
    pub revenue_by_technology: Vec<RevenueShare>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capex_guidance: Option<CapexGuidance>,
}

impl FinancialRecord {
    /// Fiscal quarter number without the `Q` prefix
    pub fn quarter_number(&self) -> Option<&str> {
        self.fiscal_quarter
            .as_deref()
            .map(|q| q.trim().trim_start_matches(['Q', 'q']))
    }
}

/// Output of the financial stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceResults {
    /// Structured record, absent when the store has nothing for the company
    pub raw_data: Option<FinancialRecord>,
    pub summary: String,
}

/// Metrics reported for one calendar quarter in the detailed dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_margin: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi_days: Option<Metric>,
}

/// Precomputed QoQ / YoY deltas for the latest quarter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestChanges {
    pub revenue_qoq: Option<String>,
    pub revenue_yoy: Option<String>,
    pub gross_margin_qoq: Option<String>,
    pub gross_margin_yoy: Option<String>,
    pub doi_qoq: Option<String>,
    pub doi_yoy: Option<String>,
}

/// Fiscal period of the latest earnings call
///
/// Either part may be missing; readers fill it from the financial record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestQuarter {
    pub fiscal_year: Option<String>,
    pub fiscal_quarter: Option<String>,
}

/// Detailed per-company quarterly time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyDataset {
    pub company_name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Keyed by calendar quarter label (e.g. "2025Q3")
    #[serde(default)]
    pub quarterly_data: BTreeMap<String, QuarterMetrics>,
    #[serde(default)]
    pub latest_changes: LatestChanges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_quarter: Option<LatestQuarter>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl QuarterlyDataset {
    /// Most recent quarter with data, ignoring keys that are not quarter labels
    pub fn most_recent_quarter(&self) -> Option<CalendarQuarter> {
        self.quarterly_data
            .keys()
            .filter_map(|key| key.parse::<CalendarQuarter>().ok())
            .max()
    }

    /// Metrics for a quarter, matching keys in either "2025Q3" or "2025 Q3" form
    pub fn quarter(&self, quarter: CalendarQuarter) -> Option<&QuarterMetrics> {
        self.quarterly_data
            .iter()
            .find(|(key, _)| key.parse::<CalendarQuarter>().ok() == Some(quarter))
            .map(|(_, metrics)| metrics)
    }
}

/// Error parsing a calendar quarter label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid calendar quarter: {0}")]
pub struct ParseQuarterError(String);

/// A calendar year and quarter, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarQuarter {
    year: i32,
    quarter: u8,
}

impl CalendarQuarter {
    /// Create a quarter; `quarter` must be in 1..=4
    pub fn new(year: i32, quarter: u8) -> Option<Self> {
        (1..=4).contains(&quarter).then_some(Self { year, quarter })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// The quarter immediately before this one
    pub fn previous(self) -> Self {
        if self.quarter == 1 {
            Self {
                year: self.year - 1,
                quarter: 4,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter - 1,
            }
        }
    }

    /// `len` consecutive quarters ending at (and including) `self`, oldest first
    pub fn window_ending(self, len: usize) -> Vec<Self> {
        let mut window = Vec::with_capacity(len);
        let mut current = self;
        for _ in 0..len {
            window.push(current);
            current = current.previous();
        }
        window.reverse();
        window
    }
}

impl fmt::Display for CalendarQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl FromStr for CalendarQuarter {
    type Err = ParseQuarterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseQuarterError(s.to_string());
        let normalized: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (year, quarter) = normalized
            .split_once(['Q', 'q'])
            .ok_or_else(err)?;
        let year = year.parse::<i32>().map_err(|_| err())?;
        let quarter = quarter.parse::<u8>().map_err(|_| err())?;
        Self::new(year, quarter).ok_or_else(err)
    }
}
