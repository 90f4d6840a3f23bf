//! News retrieval stage

use super::target_company;
use crate::store::NewsStore;
use async_trait::async_trait;
use chainlens_core::model::NewsArticle;
use chainlens_core::{AnalysisState, SectionText, Stage, StateUpdate};
use std::sync::Arc;
use tracing::{info, warn};

pub struct NewsStage {
    store: Arc<dyn NewsStore>,
    limit: usize,
}

impl NewsStage {
    pub fn new(store: Arc<dyn NewsStore>, limit: usize) -> Self {
        Self { store, limit }
    }
}

#[async_trait]
impl Stage for NewsStage {
    async fn run(&self, state: &AnalysisState) -> StateUpdate {
        let company_id = target_company(state);
        let articles = self.store.get_news(company_id, self.limit).await;

        let summary = if articles.is_empty() {
            warn!("No news for {}", company_id);
            SectionText::Unavailable(format!("No recent news available for company {company_id}."))
        } else {
            info!("Summarizing {} articles for {}", articles.len(), company_id);
            SectionText::Content(format_news_summary(&articles))
        };

        StateUpdate::News(summary)
    }

    fn name(&self) -> &str {
        "news"
    }
}

/// Headline list with a sentiment indicator per article
pub fn format_news_summary(articles: &[NewsArticle]) -> String {
    let mut summary = String::from("## 近期新聞摘要\n\n");

    for article in articles {
        summary.push_str(&format!("### {} {}\n", article.sentiment.indicator(), article.title));
        summary.push_str(&format!("*{} | {}*\n\n", article.source, article.date));
        summary.push_str(&format!("{}\n\n", article.summary));
        summary.push_str("---\n\n");
    }

    summary.trim().to_string()
}
