use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub key: String,
    pub label: String,
    pub tag: String,
    #[serde(rename = "URL")]
    pub url: String,
    pub cluster: String,
    pub text_content: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub key: String,
    pub color: String,
    pub cluster_label: String,
    pub cluster_text_content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub color: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub color: String,
    pub image: String,
}

/// Visualization-ready artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub nodes: Vec<NodeData>,
    pub edges: Vec<(String, String)>,
    pub clusters: Vec<Cluster>,
    pub tags: Vec<Tag>,
    pub labels: Vec<Label>,
}

impl Dataset {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write dataset: {:?}", path))
    }
}
