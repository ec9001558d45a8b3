use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

use crate::backend::{GraphAlgorithms, Position, Positions, Scores};
use crate::graph_data::GraphData;

pub const RING_COUNT: usize = 5;
pub const INNER_RADIUS: f64 = 0.2;
pub const RING_SPACING: f64 = 0.15;
pub const RADIUS_JITTER: f64 = 0.05;
pub const ANGLE_JITTER: f64 = 0.1;

/// Fallback scores stay clear of the 0 an isolated node gets from betweenness.
pub const SCORE_MIN: f64 = 0.1;
pub const SCORE_MAX: f64 = 0.6;

// Separate streams so the layout and the scores do not shift each other
const LAYOUT_STREAM: u64 = 0x6c61796f7574;
const SCORE_STREAM: u64 = 0x73636f7265;

/// Dependency-free stand-in: concentric rings ranked by degree and bounded
/// random scores. Never fails.
#[derive(Debug, Clone)]
pub struct NativeBackend {
    seed: u64,
}

impl NativeBackend {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(&self, stream: u64) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ stream)
    }

    /// Ring index for the node ranked `rank` of `n`.
    pub fn ring_index(rank: usize, n: usize) -> usize {
        (rank * RING_COUNT / n.max(1)).min(RING_COUNT - 1)
    }

    pub fn concentric_layout(&self, graph: &GraphData) -> Positions {
        let n = graph.len();
        let degrees = graph.edge_degrees();

        // Stable sort: equal degrees keep canonical order
        let mut ranked: Vec<usize> = (0..n).collect();
        ranked.sort_by(|&a, &b| degrees[b].cmp(&degrees[a]));

        let mut ring_sizes = [0usize; RING_COUNT];
        for rank in 0..n {
            ring_sizes[Self::ring_index(rank, n)] += 1;
        }

        let mut rng = self.rng(LAYOUT_STREAM);
        let mut slot_in_ring = [0usize; RING_COUNT];
        let mut positions = Positions::with_capacity(n);

        for (rank, &idx) in ranked.iter().enumerate() {
            let ring = Self::ring_index(rank, n);
            let slot = slot_in_ring[ring];
            slot_in_ring[ring] += 1;

            let radius = INNER_RADIUS + ring as f64 * RING_SPACING
                + rng.gen_range(-RADIUS_JITTER..=RADIUS_JITTER);
            let angle = TAU * slot as f64 / ring_sizes[ring] as f64
                + rng.gen_range(-ANGLE_JITTER..=ANGLE_JITTER);

            positions.insert(
                graph.entities[idx].clone(),
                Position::new(
                    Position::CENTER.x + radius * angle.cos(),
                    Position::CENTER.y + radius * angle.sin(),
                ),
            );
        }

        positions
    }

    pub fn bounded_scores(&self, graph: &GraphData) -> Scores {
        let mut rng = self.rng(SCORE_STREAM);
        graph
            .entities
            .iter()
            .map(|id| (id.clone(), rng.gen_range(SCORE_MIN..=SCORE_MAX)))
            .collect()
    }
}

impl GraphAlgorithms for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn layout(&self, graph: &GraphData) -> Result<Positions> {
        Ok(self.concentric_layout(graph))
    }

    fn centrality(&self, graph: &GraphData) -> Result<Scores> {
        Ok(self.bounded_scores(graph))
    }
}
