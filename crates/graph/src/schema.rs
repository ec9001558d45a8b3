use anyhow::{Context, Result};
use ingest::{ContentItem, Edge};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalNode {
    pub id: String,
    pub topic: String,
    pub content: Vec<ContentItem>,
    pub category: String,
}

/// Validated node/link structure handed to layout and scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalGraph {
    pub nodes: Vec<CanonicalNode>,
    pub links: Vec<Edge>,
}

impl CanonicalGraph {
    pub fn node(&self, id: &str) -> Option<&CanonicalNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read canonical graph: {:?}", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse canonical graph: {:?}", path))
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write canonical graph: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let graph = CanonicalGraph {
            nodes: vec![CanonicalNode {
                id: "5".to_string(),
                topic: "Alpha".to_string(),
                content: vec![ContentItem {
                    item_number: "1".to_string(),
                    text: "some text".to_string(),
                }],
                category: "Default Behaviour".to_string(),
            }],
            links: vec![Edge::new("5", "7")],
        };

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"][0]["content"][0]["item_number"], "1");
        assert_eq!(json["links"][0]["source"], "5");
        assert_eq!(json["links"][0]["target"], "7");
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let graph = CanonicalGraph {
            nodes: Vec::new(),
            links: vec![Edge::new("1", "2")],
        };

        graph.write_json(&path).unwrap();
        assert_eq!(CanonicalGraph::read_json(&path).unwrap(), graph);
    }
}
