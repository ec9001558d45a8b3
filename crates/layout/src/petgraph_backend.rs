use anyhow::{Result, bail};
use petgraph::graph::{NodeIndex, UnGraph};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::backend::{GraphAlgorithms, Positions, Scores};
use crate::centrality::betweenness;
use crate::graph_data::GraphData;
use crate::radial;
use crate::spring::SpringLayout;

/// Spring layout with degree-biased radial correction, and true betweenness.
#[derive(Debug, Clone)]
pub struct PetgraphBackend {
    spring: SpringLayout,
    seed: u64,
}

impl PetgraphBackend {
    pub fn new(repulsion: f64, iterations: usize, seed: u64) -> Self {
        Self {
            spring: SpringLayout::new(repulsion, iterations),
            seed,
        }
    }

    /// Undirected simple graph: self-loops are dropped and parallel or
    /// reversed links collapse into one edge.
    pub fn build_graph(graph: &GraphData) -> UnGraph<(), ()> {
        let mut ungraph = UnGraph::with_capacity(graph.len(), graph.edges.len());
        for _ in &graph.entities {
            ungraph.add_node(());
        }
        for &(source, target) in &graph.edges {
            if source != target {
                ungraph.update_edge(NodeIndex::new(source), NodeIndex::new(target), ());
            }
        }
        ungraph
    }
}

impl GraphAlgorithms for PetgraphBackend {
    fn name(&self) -> &'static str {
        "petgraph"
    }

    fn layout(&self, graph: &GraphData) -> Result<Positions> {
        let ungraph = Self::build_graph(graph);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let raw = self.spring.run(&ungraph, &mut rng);

        if raw.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            bail!("spring layout produced non-finite coordinates");
        }

        let degrees: Vec<usize> = ungraph
            .node_indices()
            .map(|idx| ungraph.neighbors(idx).count())
            .collect();
        let max_degree = degrees.iter().copied().max().unwrap_or(0);

        let mut positions = Positions::with_capacity(graph.len());
        for (idx, id) in graph.entities.iter().enumerate() {
            let position = match raw.get(idx) {
                Some(&p) => radial::degree_biased(p, degrees[idx], max_degree),
                None => radial::outer_ring(&mut rng),
            };
            positions.insert(id.clone(), position);
        }

        Ok(positions)
    }

    fn centrality(&self, graph: &GraphData) -> Result<Scores> {
        let ungraph = Self::build_graph(graph);
        let scores = betweenness(&ungraph);

        Ok(graph.entities.iter().cloned().zip(scores).collect())
    }
}
