//! Earnings-call transcripts and news articles

use serde::{Deserialize, Serialize};

/// One earnings-call record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsCall {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub outlook: String,
    #[serde(default)]
    pub management_quotes: Vec<String>,
}

/// Tone of a news article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    #[serde(other)]
    Unrecognized,
}

impl Sentiment {
    /// Coloured indicator shown next to a headline
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Positive => "🟢",
            Self::Negative => "🔴",
            Self::Neutral | Self::Unrecognized => "🟡",
        }
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::Neutral
    }
}

/// One news article and the companies it mentions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub related_companies: Vec<String>,
}

impl NewsArticle {
    pub fn mentions(&self, company_id: &str) -> bool {
        self.related_companies.iter().any(|id| id == company_id)
    }
}
