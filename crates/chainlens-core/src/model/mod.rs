//! Domain records shared by every stage

pub mod company;
pub mod content;
pub mod financial;

pub use company::{
    CompanyNode, GraphEdge, NodeRole, RelatedCompanies, RelatedCompany, Relation,
    SupplyChainAnalysis,
};
pub use content::{EarningsCall, NewsArticle, Sentiment};
pub use financial::{
    CalendarQuarter, CapexGuidance, FinanceResults, FinancialRecord, LatestChanges,
    LatestQuarter, Metric, ParseQuarterError, QuarterMetrics, QuarterlyDataset, RevenueShare,
};
