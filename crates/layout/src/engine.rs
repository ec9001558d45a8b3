use graph::{CanonicalGraph, Diagnostic, Diagnostics, Stage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{info, warn};

use crate::backend::{GraphAlgorithms, Positions, Scores};
use crate::graph_data::GraphData;
use crate::native::NativeBackend;
use crate::radial;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Auto,   // Graph library when compiled in, native otherwise
    Native, // Always the deterministic fallback
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub backend: BackendMode,
    pub seed: u64,
    pub iterations: usize,
    pub repulsion: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            backend: BackendMode::Auto,
            seed: 42,
            iterations: 50,
            repulsion: 0.5,
        }
    }
}

/// The provider chosen for a run, plus why the preferred one was not used.
///
/// Cloning shares the provider, so both engines of one run use the same one.
#[derive(Clone)]
pub struct Selection {
    pub algorithms: Rc<dyn GraphAlgorithms>,
    pub degraded: Option<String>,
}

impl Selection {
    /// Record the degradation, if any. Call once per run, not per engine.
    pub fn report(&self, diagnostics: &mut Diagnostics) {
        if let Some(reason) = &self.degraded {
            diagnostics.push(Diagnostic::CapabilityFallback {
                stage: Stage::Selection,
                reason: reason.clone(),
            });
        }
    }
}

/// Pick the provider once; both engines keep it for the whole run.
pub fn select_backend(config: &LayoutConfig) -> Selection {
    match config.backend {
        BackendMode::Native => Selection {
            algorithms: Rc::new(NativeBackend::new(config.seed)),
            degraded: Some("native backend requested".to_string()),
        },
        #[cfg(feature = "petgraph")]
        BackendMode::Auto => Selection {
            algorithms: Rc::new(crate::petgraph_backend::PetgraphBackend::new(
                config.repulsion,
                config.iterations,
                config.seed,
            )),
            degraded: None,
        },
        #[cfg(not(feature = "petgraph"))]
        BackendMode::Auto => Selection {
            algorithms: Rc::new(NativeBackend::new(config.seed)),
            degraded: Some("built without the petgraph feature".to_string()),
        },
    }
}

pub struct LayoutEngine {
    selection: Selection,
    fallback: NativeBackend,
    seed: u64,
}

impl LayoutEngine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self::with_algorithms(select_backend(config), config.seed)
    }

    pub fn with_algorithms(selection: Selection, seed: u64) -> Self {
        Self {
            selection,
            fallback: NativeBackend::new(seed),
            seed,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.selection.algorithms.name()
    }

    /// Position for every node of `graph`. Never fails; a provider error is
    /// recorded in `diagnostics`. Selection-time degradation is reported by
    /// `Selection::report`.
    pub fn compute(&self, graph: &CanonicalGraph, diagnostics: &mut Diagnostics) -> Positions {
        let data = GraphData::from_canonical(graph);
        let mut positions = match self.selection.algorithms.layout(&data) {
            Ok(positions) => positions,
            Err(e) => {
                warn!(error = %e, "Layout backend failed");
                diagnostics.push(Diagnostic::CapabilityFallback {
                    stage: Stage::Layout,
                    reason: e.to_string(),
                });
                self.fallback.concentric_layout(&data)
            }
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        for id in &data.entities {
            positions
                .entry(id.clone())
                .or_insert_with(|| radial::outer_ring(&mut rng));
        }

        info!(backend = self.backend_name(), nodes = positions.len(), "Computed layout");
        positions
    }
}

pub struct ScoringEngine {
    selection: Selection,
    fallback: NativeBackend,
}

impl ScoringEngine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self::with_algorithms(select_backend(config), config.seed)
    }

    pub fn with_algorithms(selection: Selection, seed: u64) -> Self {
        Self {
            selection,
            fallback: NativeBackend::new(seed),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.selection.algorithms.name()
    }

    /// Score for every node of `graph`; nodes the provider leaves out score 0.
    pub fn compute(&self, graph: &CanonicalGraph, diagnostics: &mut Diagnostics) -> Scores {
        let data = GraphData::from_canonical(graph);
        let scores = match self.selection.algorithms.centrality(&data) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "Scoring backend failed");
                diagnostics.push(Diagnostic::CapabilityFallback {
                    stage: Stage::Scoring,
                    reason: e.to_string(),
                });
                self.fallback.bounded_scores(&data)
            }
        };

        info!(backend = self.backend_name(), nodes = data.len(), "Computed scores");
        graph
            .nodes
            .iter()
            .map(|node| (node.id.clone(), scores.get(&node.id).copied().unwrap_or(0.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Position;
    use crate::native::{SCORE_MAX, SCORE_MIN};
    use anyhow::{Result, bail};
    use graph::{CanonicalNode, Edge};

    fn canonical(ids: &[&str], links: &[(&str, &str)]) -> CanonicalGraph {
        CanonicalGraph {
            nodes: ids
                .iter()
                .map(|id| CanonicalNode {
                    id: id.to_string(),
                    topic: format!("topic {}", id),
                    content: Vec::new(),
                    category: "Default Behaviour".to_string(),
                })
                .collect(),
            links: links.iter().map(|(s, t)| Edge::new(*s, *t)).collect(),
        }
    }

    /// Provider that always errors, to exercise run-time fallback.
    struct Broken;

    impl GraphAlgorithms for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn layout(&self, _graph: &GraphData) -> Result<Positions> {
            bail!("layout unavailable")
        }

        fn centrality(&self, _graph: &GraphData) -> Result<Scores> {
            bail!("centrality unavailable")
        }
    }

    /// Provider that covers only the first node.
    struct Partial;

    impl GraphAlgorithms for Partial {
        fn name(&self) -> &'static str {
            "partial"
        }

        fn layout(&self, graph: &GraphData) -> Result<Positions> {
            Ok(graph.entities.iter().take(1).map(|id| (id.clone(), Position::CENTER)).collect())
        }

        fn centrality(&self, graph: &GraphData) -> Result<Scores> {
            Ok(graph.entities.iter().take(1).map(|id| (id.clone(), 0.9)).collect())
        }
    }

    fn selection(algorithms: Rc<dyn GraphAlgorithms>) -> Selection {
        Selection {
            algorithms,
            degraded: None,
        }
    }

    #[test]
    fn test_native_mode_records_fallback_once_per_run() {
        let config = LayoutConfig {
            backend: BackendMode::Native,
            ..LayoutConfig::default()
        };
        let graph = canonical(&["1", "2", "3"], &[("1", "2"), ("2", "3")]);
        let mut diagnostics = Diagnostics::new();

        let selection = select_backend(&config);
        selection.report(&mut diagnostics);
        let layout = LayoutEngine::with_algorithms(selection.clone(), config.seed);
        let scoring = ScoringEngine::with_algorithms(selection, config.seed);

        let positions = layout.compute(&graph, &mut diagnostics);
        let scores = scoring.compute(&graph, &mut diagnostics);

        assert_eq!(layout.backend_name(), "native");
        assert_eq!(scoring.backend_name(), "native");
        assert_eq!(positions.len(), 3);
        assert!(scores.values().all(|s| (SCORE_MIN..=SCORE_MAX).contains(s)));
        assert_eq!(diagnostics.fallbacks(), vec![Stage::Selection]);
    }

    #[test]
    fn test_failing_provider_falls_back() {
        let graph = canonical(&["a", "b"], &[("a", "b")]);
        let mut diagnostics = Diagnostics::new();

        let layout = LayoutEngine::with_algorithms(selection(Rc::new(Broken)), 1);
        let scoring = ScoringEngine::with_algorithms(selection(Rc::new(Broken)), 1);

        let positions = layout.compute(&graph, &mut diagnostics);
        let scores = scoring.compute(&graph, &mut diagnostics);

        assert_eq!(positions, NativeBackend::new(1).concentric_layout(&GraphData::from_canonical(&graph)));
        assert!(scores.values().all(|s| (SCORE_MIN..=SCORE_MAX).contains(s)));
        assert_eq!(diagnostics.fallbacks(), vec![Stage::Layout, Stage::Scoring]);
    }

    #[test]
    fn test_nodes_missing_from_scores_get_zero() {
        let graph = canonical(&["a", "b"], &[("a", "b")]);
        let mut diagnostics = Diagnostics::new();

        let scores = ScoringEngine::with_algorithms(selection(Rc::new(Partial)), 1)
            .compute(&graph, &mut diagnostics);

        assert_eq!(scores["a"], 0.9);
        assert_eq!(scores["b"], 0.0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_nodes_missing_from_layout_land_on_outer_ring() {
        let graph = canonical(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let mut diagnostics = Diagnostics::new();

        let positions = LayoutEngine::with_algorithms(selection(Rc::new(Partial)), 5)
            .compute(&graph, &mut diagnostics);

        assert_eq!(positions["a"], Position::CENTER);
        for id in ["b", "c"] {
            let r = positions[id].distance_to(Position::CENTER);
            assert!((0.8 - 1e-9..=1.0 + 1e-9).contains(&r));
        }
    }

    #[cfg(feature = "petgraph")]
    #[test]
    fn test_auto_mode_uses_graph_library() {
        let config = LayoutConfig::default();
        let graph = canonical(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let mut diagnostics = Diagnostics::new();

        let engine = ScoringEngine::new(&config);
        let scores = engine.compute(&graph, &mut diagnostics);

        assert_eq!(engine.backend_name(), "petgraph");
        assert_eq!(scores["b"], 1.0);
        assert_eq!(scores["a"], 0.0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"backend": "native", "seed": 7}"#).unwrap();
        assert_eq!(config.backend, BackendMode::Native);
        assert_eq!(config.seed, 7);
        assert_eq!(config.iterations, 50);
    }
}
