pub mod backend;
#[cfg(feature = "petgraph")]
pub mod centrality;
pub mod engine;
pub mod graph_data;
pub mod native;
#[cfg(feature = "petgraph")]
pub mod petgraph_backend;
pub mod radial;
#[cfg(feature = "petgraph")]
pub mod spring;

pub use backend::{GraphAlgorithms, Position, Positions, Scores};
pub use engine::{BackendMode, LayoutConfig, LayoutEngine, ScoringEngine, Selection, select_backend};
pub use graph_data::GraphData;
pub use native::NativeBackend;
#[cfg(feature = "petgraph")]
pub use petgraph_backend::PetgraphBackend;

/// Layout and score for every node of one graph.
#[derive(Debug, Clone, Default)]
pub struct GraphMetrics {
    pub positions: Positions,
    pub scores: Scores,
}
