//! Supply-chain relationship graph

use super::RelationshipGraph;
use chainlens_core::model::{
    CompanyNode, GraphEdge, NodeRole, RelatedCompanies, RelatedCompany, Relation,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-disk shape of `supply_chain_graph.json`
#[derive(Debug, Default, Serialize, Deserialize)]
struct GraphFile {
    #[serde(default)]
    nodes: Vec<CompanyNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

/// Directed company graph with an id index
#[derive(Debug, Clone, Default)]
pub struct SupplyChainGraph {
    nodes: Vec<CompanyNode>,
    edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
}

impl SupplyChainGraph {
    pub fn new(nodes: Vec<CompanyNode>, edges: Vec<GraphEdge>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            // First occurrence wins for duplicate ids
            index.entry(node.id.clone()).or_insert(position);
        }
        Self {
            nodes,
            edges,
            index,
        }
    }

    /// Parse the `{nodes, edges}` JSON document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let file: GraphFile = serde_json::from_str(json)?;
        Ok(Self::new(file.nodes, file.edges))
    }

    pub fn nodes(&self) -> &[CompanyNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Node for an edge endpoint, or an `Unknown` placeholder
    fn node_or_placeholder(&self, company_id: &str) -> CompanyNode {
        self.get_node(company_id)
            .cloned()
            .unwrap_or_else(|| CompanyNode::unknown(company_id))
    }
}

impl RelationshipGraph for SupplyChainGraph {
    fn get_node(&self, company_id: &str) -> Option<&CompanyNode> {
        self.index.get(company_id).map(|&position| &self.nodes[position])
    }

    fn get_related(&self, company_id: &str) -> RelatedCompanies {
        let mut related = RelatedCompanies::default();

        for edge in &self.edges {
            if edge.target == company_id {
                let entry = || {
                    RelatedCompany::new(self.node_or_placeholder(&edge.source), &edge.description)
                };
                match edge.relation {
                    Relation::Client => related.customers.push(entry()),
                    Relation::Supplier => related.suppliers.push(entry()),
                    Relation::Partner => related.partners.push(entry()),
                    Relation::Other => {}
                }
            } else if edge.source == company_id && edge.relation == Relation::Partner {
                related.partners.push(RelatedCompany::new(
                    self.node_or_placeholder(&edge.target),
                    &edge.description,
                ));
            }
        }

        if let Some(target) = self.get_node(company_id) {
            related.competitors = self
                .nodes
                .iter()
                .filter(|node| {
                    node.id != company_id
                        && node.role == NodeRole::Competitor
                        && node.category == target.category
                })
                .cloned()
                .map(RelatedCompany::without_description)
                .collect();
        }

        related
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = r#"{
        "nodes": [
            {"id": "2330", "name": "TSMC", "country": "Taiwan", "category": "Foundry", "role": "Self", "tags": ["3nm"]},
            {"id": "AAPL", "name": "Apple", "country": "USA", "category": "Consumer Electronics", "role": "Customer", "tags": ["Mobile"]},
            {"id": "ASML", "name": "ASML", "country": "Netherlands", "category": "Equipment", "role": "Supplier", "tags": ["EUV"]},
            {"id": "ARM", "name": "Arm", "country": "UK", "category": "IP", "role": "Partner", "tags": []},
            {"id": "5930", "name": "Samsung", "country": "South Korea", "category": "Foundry", "role": "Competitor", "tags": ["GAA"]},
            {"id": "INTC", "name": "Intel", "country": "USA", "category": "IDM", "role": "Competitor", "tags": []}
        ],
        "edges": [
            {"source": "AAPL", "target": "2330", "relation": "Client", "description": "A-series chips"},
            {"source": "ASML", "target": "2330", "relation": "Supplier", "description": "EUV lithography"},
            {"source": "2330", "target": "ARM", "relation": "Partner", "description": "Design enablement"},
            {"source": "GHOST", "target": "2330", "relation": "Client", "description": ""}
        ]
    }"#;

    #[test]
    fn test_related_companies() {
        let graph = SupplyChainGraph::from_json(GRAPH).unwrap();
        let related = graph.get_related("2330");

        let names = |list: &[RelatedCompany]| -> Vec<String> {
            list.iter().map(|r| r.company.name.clone()).collect()
        };
        assert_eq!(names(&related.customers), vec!["Apple", "Unknown"]);
        assert_eq!(names(&related.suppliers), vec!["ASML"]);
        assert_eq!(names(&related.partners), vec!["Arm"]);
        // Intel is a competitor but in another category
        assert_eq!(names(&related.competitors), vec!["Samsung"]);

        assert_eq!(
            related.customers[0].relationship_description.as_deref(),
            Some("A-series chips")
        );
        assert!(related.customers[1].relationship_description.is_none());
        assert_eq!(related.customers[1].company.id, "GHOST");
    }

    #[test]
    fn test_partner_edge_seen_from_both_ends() {
        let graph = SupplyChainGraph::from_json(GRAPH).unwrap();
        let related = graph.get_related("ARM");
        assert_eq!(related.partners.len(), 1);
        assert_eq!(related.partners[0].company.id, "2330");
        assert!(related.customers.is_empty());
    }

    #[test]
    fn test_unknown_company_has_no_relations() {
        let graph = SupplyChainGraph::from_json(GRAPH).unwrap();
        assert!(!graph.contains("ZZZZ"));
        assert!(graph.get_related("ZZZZ").is_empty());
    }

    #[test]
    fn test_lookup() {
        let graph = SupplyChainGraph::from_json(GRAPH).unwrap();
        assert!(graph.contains("2330"));
        assert_eq!(graph.get_node("ASML").unwrap().country, "Netherlands");
        assert_eq!(graph.nodes().len(), 6);
        assert_eq!(graph.edges().len(), 4);
    }
}
