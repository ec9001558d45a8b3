use indexmap::IndexMap;
use ingest::{ClusterRecord, RelationTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::info;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::schema::{CanonicalGraph, CanonicalNode};

pub const DEFAULT_CATEGORY: &str = "Default Behaviour";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    pub default_category: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Assembly {
    pub graph: CanonicalGraph,
    pub diagnostics: Diagnostics,
}

/// Joins the cluster report with the relation table.
///
/// Filtering is strict (only related clusters become nodes, dangling links
/// are removed) while every inconsistency is only reported.
pub struct GraphAssembler {
    config: AssemblerConfig,
}

impl GraphAssembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Build the canonical graph. A node whose every link dangles is
    /// reported as an `OrphanNode` but kept in the node set.
    pub fn assemble(
        &self,
        clusters: &IndexMap<u64, ClusterRecord>,
        relations: &RelationTable,
    ) -> Assembly {
        let mut diagnostics = Diagnostics::new();
        let cluster_ids: BTreeSet<u64> = clusters.keys().copied().collect();
        let connected = &relations.connected_ids;

        // Step 1: referenced but never described
        for &id in connected.difference(&cluster_ids) {
            diagnostics.push(Diagnostic::MissingCluster { id });
        }

        // Step 2: described but never referenced
        for &id in cluster_ids.difference(connected) {
            diagnostics.push(Diagnostic::UnconnectedCluster { id });
        }

        // Step 3: keep only connected clusters, in report order
        let nodes: Vec<CanonicalNode> = clusters
            .values()
            .filter(|record| connected.contains(&record.id))
            .map(|record| CanonicalNode {
                id: record.id.to_string(),
                topic: record.topic.clone(),
                content: record.content.clone(),
                category: self.config.default_category.clone(),
            })
            .collect();

        // Step 4: every link endpoint must be a node
        let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let mut links = Vec::with_capacity(relations.edges.len());
        for edge in &relations.edges {
            if node_ids.contains(edge.source.as_str()) && node_ids.contains(edge.target.as_str()) {
                links.push(edge.clone());
            } else {
                diagnostics.push(Diagnostic::DanglingEdge {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
        }

        // Step 5: checked independently of step 3, against the surviving links
        let endpoints: HashSet<&str> = links
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect();
        for node in &nodes {
            if !endpoints.contains(node.id.as_str()) {
                diagnostics.push(Diagnostic::OrphanNode { id: node.id.clone() });
            }
        }

        info!(
            nodes = nodes.len(),
            links = links.len(),
            diagnostics = diagnostics.len(),
            "Assembled canonical graph"
        );

        Assembly {
            graph: CanonicalGraph { nodes, links },
            diagnostics,
        }
    }
}

impl Default for GraphAssembler {
    fn default() -> Self {
        Self::new(AssemblerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest::{ClusterParser, Edge, RelationParser};

    fn assemble(report: &str, table: &str) -> Assembly {
        let clusters = ClusterParser::parse_str(report);
        let relations = RelationParser::parse_str(table).unwrap();
        GraphAssembler::default().assemble(&clusters, &relations)
    }

    const REPORT: &str = "\
Index 1 - Cluster 5 - topic : Alpha
(1) some text
Index 2 - Cluster 7 - topic : Beta
(1) some text
";

    #[test]
    fn test_two_node_example() {
        let assembly = assemble(REPORT, "from,to,relation\n(5) topic : Alpha,(7) topic : Beta,C\n");

        let ids: Vec<&str> = assembly.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "7"]);
        assert_eq!(assembly.graph.links, vec![Edge::new("5", "7")]);
        assert_eq!(assembly.graph.nodes[0].category, DEFAULT_CATEGORY);
        assert!(assembly.diagnostics.is_empty());
    }

    #[test]
    fn test_unconnected_cluster_is_dropped_and_reported() {
        let report = format!("{REPORT}Index 3 - Cluster 9 - topic : Lonely\n(1) alone\n");
        let assembly = assemble(&report, "a,b,c\n(5) topic : A,(7) topic : B,E\n");

        assert!(assembly.graph.node("9").is_none());
        assert_eq!(assembly.graph.nodes.len(), 2);
        assert_eq!(assembly.diagnostics.unconnected_clusters(), vec![9]);
    }

    #[test]
    fn test_missing_cluster_makes_dangling_edge() {
        let table = "a,b,c\n(5) topic : A,(7) topic : B,C\n(5) topic : A,(11) topic : Z,C\n";
        let assembly = assemble(REPORT, table);

        assert_eq!(assembly.diagnostics.missing_clusters(), vec![11]);
        assert_eq!(assembly.diagnostics.dangling_edges(), vec![("5", "11")]);
        assert_eq!(assembly.graph.links, vec![Edge::new("5", "7")]);
        assert!(assembly.diagnostics.orphan_nodes().is_empty());
    }

    #[test]
    fn test_node_whose_only_link_dangles_is_orphaned() {
        // Cluster 7 is connected only through a cluster missing from the report
        let table = "a,b,c\n(5) topic : A,(5) topic : A,C\n(7) topic : B,(12) topic : Q,C\n";
        let assembly = assemble(REPORT, table);

        assert_eq!(assembly.graph.nodes.len(), 2);
        assert_eq!(assembly.diagnostics.orphan_nodes(), vec!["7"]);
        // Reported, not removed
        assert!(assembly.graph.node("7").is_some());
    }

    #[test]
    fn test_every_link_endpoint_is_a_node_and_every_node_is_linked() {
        let report = "\
Index 1 - Cluster 1 - topic : One
Index 2 - Cluster 2 - topic : Two
Index 3 - Cluster 3 - topic : Three
Index 4 - Cluster 4 - topic : Four
";
        let table = "\
a,b,c
(1) topic : x,(2) topic : x,C
(2) topic : x,(3) topic : x,E
(3) topic : x,(8) topic : x,C
";
        let assembly = assemble(report, table);
        let graph = &assembly.graph;

        for link in &graph.links {
            assert!(graph.node(&link.source).is_some());
            assert!(graph.node(&link.target).is_some());
        }
        for node in &graph.nodes {
            assert!(graph.links.iter().any(|l| l.source == node.id || l.target == node.id));
        }
        assert!(graph.node("4").is_none());
    }

    #[test]
    fn test_custom_category() {
        let assembler = GraphAssembler::new(AssemblerConfig {
            default_category: "Causal".to_string(),
        });
        let clusters = ClusterParser::parse_str(REPORT);
        let relations = RelationParser::parse_str("a,b,c\n(5) topic : A,(7) topic : B,C\n").unwrap();

        let assembly = assembler.assemble(&clusters, &relations);
        assert!(assembly.graph.nodes.iter().all(|n| n.category == "Causal"));
    }
}
