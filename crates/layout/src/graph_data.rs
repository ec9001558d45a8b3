use graph::CanonicalGraph;
use std::collections::HashMap;

/// Index-based view of a canonical graph shared by every backend.
#[derive(Debug, Clone, Default)]
pub struct GraphData {
    pub entities: Vec<String>,
    pub edges: Vec<(usize, usize)>, // (source_idx, target_idx), directed as in the links
    pub entity_to_idx: HashMap<String, usize>,
}

impl GraphData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in canonical order; links whose endpoints are not nodes are skipped.
    pub fn from_canonical(graph: &CanonicalGraph) -> Self {
        let mut data = Self::new();
        for node in &graph.nodes {
            data.add_entity(node.id.clone());
        }

        for link in &graph.links {
            let source = data.entity_to_idx.get(&link.source).copied();
            let target = data.entity_to_idx.get(&link.target).copied();
            if let (Some(source), Some(target)) = (source, target) {
                data.add_edge(source, target);
            }
        }

        data
    }

    pub fn add_entity(&mut self, entity_id: String) -> usize {
        if let Some(&idx) = self.entity_to_idx.get(&entity_id) {
            return idx;
        }

        let idx = self.entities.len();
        self.entities.push(entity_id.clone());
        self.entity_to_idx.insert(entity_id, idx);
        idx
    }

    pub fn add_edge(&mut self, source: usize, target: usize) {
        self.edges.push((source, target));
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Degree counted straight off the edge list: every link adds one to
    /// each endpoint, reversed pairs included.
    pub fn edge_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.entities.len()];
        for &(source, target) in &self.edges {
            degrees[source] += 1;
            degrees[target] += 1;
        }
        degrees
    }
}
