use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::graph_data::GraphData;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const CENTER: Position = Position { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

pub type Positions = HashMap<String, Position>;
pub type Scores = HashMap<String, f64>;

/// Capability seam over a graph-algorithms provider.
pub trait GraphAlgorithms {
    fn name(&self) -> &'static str;

    /// Position per node id.
    fn layout(&self, graph: &GraphData) -> Result<Positions>;

    /// Importance score per node id. Nodes may be absent from the result.
    fn centrality(&self, graph: &GraphData) -> Result<Scores>;
}
