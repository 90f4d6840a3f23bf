//! Company profiles and supply-chain relationship records

use serde::{Deserialize, Serialize};

/// Role a company plays in the relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    Customer,
    Supplier,
    Partner,
    Competitor,
    /// The company the graph is centred on
    #[serde(rename = "Self")]
    SelfNode,
    /// Any role label the graph does not define
    #[serde(other)]
    Unknown,
}

impl NodeRole {
    /// Label used in rendered output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Supplier => "Supplier",
            Self::Partner => "Partner",
            Self::Competitor => "Competitor",
            Self::SelfNode => "Self",
            Self::Unknown => "Unknown",
        }
    }
}

impl Default for NodeRole {
    fn default() -> Self {
        Self::Unknown
    }
}

/// A company node in the relationship graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyNode {
    pub id: String,
    #[serde(default = "unknown_label")]
    pub name: String,
    #[serde(default = "unknown_label")]
    pub country: String,
    #[serde(default = "unknown_label")]
    pub category: String,
    #[serde(default)]
    pub role: NodeRole,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn unknown_label() -> String {
    "Unknown".to_string()
}

impl CompanyNode {
    /// Placeholder profile for an identifier the graph does not know
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: unknown_label(),
            country: unknown_label(),
            category: unknown_label(),
            role: NodeRole::Unknown,
            tags: Vec::new(),
        }
    }

    /// Check whether any tag contains `needle` (case-sensitive)
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        self.tags.iter().any(|tag| tag.contains(needle))
    }
}

/// Relation carried by a directed graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Client,
    Supplier,
    Partner,
    #[serde(other)]
    Other,
}

/// Directed edge between two companies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
    #[serde(default)]
    pub description: String,
}

/// A company related to the target, with the description of the edge that links them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedCompany {
    #[serde(flatten)]
    pub company: CompanyNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_description: Option<String>,
}

impl RelatedCompany {
    pub fn new(company: CompanyNode, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            company,
            relationship_description: (!description.is_empty()).then_some(description),
        }
    }

    /// Related company without an edge description (competitors)
    pub fn without_description(company: CompanyNode) -> Self {
        Self {
            company,
            relationship_description: None,
        }
    }
}

/// The four relationship lists derived for one target company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedCompanies {
    pub customers: Vec<RelatedCompany>,
    pub suppliers: Vec<RelatedCompany>,
    pub partners: Vec<RelatedCompany>,
    pub competitors: Vec<RelatedCompany>,
}

impl RelatedCompanies {
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
            && self.suppliers.is_empty()
            && self.partners.is_empty()
            && self.competitors.is_empty()
    }
}

/// Output of the supply-chain stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainAnalysis {
    pub summary: String,
    #[serde(flatten)]
    pub related: RelatedCompanies,
}

impl SupplyChainAnalysis {
    /// Analysis for a company that is missing from the graph
    pub fn unavailable(company_id: &str) -> Self {
        Self {
            summary: format!("No supply chain data available for company {company_id}."),
            related: RelatedCompanies::default(),
        }
    }
}
