use graph::{CanonicalGraph, Diagnostic, Diagnostics};
use indexmap::IndexMap;
use layout::{GraphMetrics, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::palette::Palette;
use crate::schema::{Cluster, Dataset, Label, NodeData, Tag};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetConfig {
    /// Probability of keeping each edge; 1.0 keeps all of them.
    pub edge_retention: f64,
    pub default_image: String,
    /// Prefix for node URLs; empty leaves URLs blank.
    pub url_base: String,
    pub seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            edge_retention: 1.0,
            default_image: "unknown.svg".to_string(),
            url_base: String::new(),
            seed: 42,
        }
    }
}

pub struct DatasetBuilder {
    config: DatasetConfig,
}

impl DatasetBuilder {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        graph: &CanonicalGraph,
        metrics: &GraphMetrics,
        diagnostics: &mut Diagnostics,
    ) -> Dataset {
        let mut palette = Palette::new();
        let mut dataset = Dataset::default();
        let mut tags: IndexMap<String, Tag> = IndexMap::new();
        let mut labels: IndexMap<String, Label> = IndexMap::new();

        for node in &graph.nodes {
            let color = palette.color_for(&node.category);
            let texts: Vec<String> = node.content.iter().map(|c| c.text.clone()).collect();
            let position = metrics
                .positions
                .get(&node.id)
                .copied()
                .unwrap_or(Position::CENTER);
            let url = if self.config.url_base.is_empty() {
                String::new()
            } else {
                format!("{}{}", self.config.url_base, node.id)
            };

            dataset.nodes.push(NodeData {
                key: node.id.clone(),
                label: node.topic.clone(),
                tag: node.category.clone(),
                url,
                cluster: node.id.clone(),
                text_content: texts.clone(),
                x: position.x,
                y: position.y,
                score: metrics.scores.get(&node.id).copied().unwrap_or(0.0),
            });

            dataset.clusters.push(Cluster {
                key: node.id.clone(),
                color: color.to_string(),
                cluster_label: node.topic.clone(),
                cluster_text_content: texts,
            });

            tags.entry(node.category.clone()).or_insert_with(|| Tag {
                key: node.category.clone(),
                color: color.to_string(),
                image: self.config.default_image.clone(),
            });
            labels.entry(node.topic.clone()).or_insert_with(|| Label {
                key: node.topic.clone(),
                color: color.to_string(),
                image: self.config.default_image.clone(),
            });
        }

        let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut candidates = Vec::with_capacity(graph.links.len());
        for link in &graph.links {
            if node_ids.contains(link.source.as_str()) && node_ids.contains(link.target.as_str()) {
                candidates.push((link.source.clone(), link.target.clone()));
            } else {
                diagnostics.push(Diagnostic::OmittedEdge {
                    source: link.source.clone(),
                    target: link.target.clone(),
                });
            }
        }
        dataset.edges = self.retain_edges(candidates, diagnostics);

        dataset.tags = tags.into_values().collect();
        dataset.labels = labels.into_values().collect();

        info!(
            nodes = dataset.nodes.len(),
            edges = dataset.edges.len(),
            tags = dataset.tags.len(),
            labels = dataset.labels.len(),
            "Built dataset"
        );

        dataset
    }

    /// Randomly thin edges when `edge_retention` is below 1.
    fn retain_edges(
        &self,
        edges: Vec<(String, String)>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<(String, String)> {
        let ratio = self.config.edge_retention;
        if ratio.is_nan() || ratio >= 1.0 {
            return edges;
        }

        let total = edges.len();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let kept: Vec<(String, String)> = edges
            .into_iter()
            .filter(|_| rng.gen_bool(ratio.max(0.0)))
            .collect();

        diagnostics.push(Diagnostic::EdgesThinned {
            kept: kept.len(),
            dropped: total - kept.len(),
        });
        kept
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new(DatasetConfig::default())
    }
}
