use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Pipeline stage a capability fallback happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Backend chosen for the whole run; covers layout and scoring.
    Selection,
    Layout,
    Scoring,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Selection => write!(f, "backend selection"),
            Stage::Layout => write!(f, "layout"),
            Stage::Scoring => write!(f, "scoring"),
        }
    }
}

/// Advisory finding. None of these abort a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    MissingCluster { id: u64 },
    UnconnectedCluster { id: u64 },
    DanglingEdge { source: String, target: String },
    OrphanNode { id: String },
    OmittedEdge { source: String, target: String },
    EdgesThinned { kept: usize, dropped: usize },
    CapabilityFallback { stage: Stage, reason: String },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MissingCluster { .. } => "missing",
            Diagnostic::UnconnectedCluster { .. } => "unconnected",
            Diagnostic::DanglingEdge { .. } => "dangling_edge",
            Diagnostic::OrphanNode { .. } => "orphan_node",
            Diagnostic::OmittedEdge { .. } => "omitted_edge",
            Diagnostic::EdgesThinned { .. } => "edges_thinned",
            Diagnostic::CapabilityFallback { .. } => "capability_fallback",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingCluster { id } => {
                write!(f, "cluster {} is referenced by a relation but missing from the report", id)
            }
            Diagnostic::UnconnectedCluster { id } => {
                write!(f, "cluster {} is unconnected and was left out of the graph", id)
            }
            Diagnostic::DanglingEdge { source, target } => {
                write!(f, "edge {} -> {} has an endpoint outside the node set", source, target)
            }
            Diagnostic::OrphanNode { id } => write!(f, "node {} is not used by any edge", id),
            Diagnostic::OmittedEdge { source, target } => {
                write!(f, "edge {} -> {} omitted from the dataset", source, target)
            }
            Diagnostic::EdgesThinned { kept, dropped } => {
                write!(f, "edge retention kept {} edges and dropped {}", kept, dropped)
            }
            Diagnostic::CapabilityFallback { stage, reason } => {
                write!(f, "{} fell back to the native backend: {}", stage, reason)
            }
        }
    }
}

/// Ordered collector returned next to each stage's result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding and emit it as a warning.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(kind = diagnostic.kind(), "{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Move another collector's entries in without logging them again.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn missing_clusters(&self) -> Vec<u64> {
        self.iter()
            .filter_map(|d| match d {
                Diagnostic::MissingCluster { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn unconnected_clusters(&self) -> Vec<u64> {
        self.iter()
            .filter_map(|d| match d {
                Diagnostic::UnconnectedCluster { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn dangling_edges(&self) -> Vec<(&str, &str)> {
        self.iter()
            .filter_map(|d| match d {
                Diagnostic::DanglingEdge { source, target } => Some((source.as_str(), target.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn orphan_nodes(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|d| match d {
                Diagnostic::OrphanNode { id } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fallbacks(&self) -> Vec<Stage> {
        self.iter()
            .filter_map(|d| match d {
                Diagnostic::CapabilityFallback { stage, .. } => Some(*stage),
                _ => None,
            })
            .collect()
    }

    /// Count of entries per kind, in first-seen order.
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        let mut counts: IndexMap<&'static str, usize> = IndexMap::new();
        for d in &self.entries {
            *counts.entry(d.kind()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
