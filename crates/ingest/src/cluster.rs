use anyhow::Result;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::reader::FileReader;

// Index <int> - Cluster <int> - topic : <text>
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^index\s+(\d+)\s*-\s*cluster\s+(\d+)\s*-\s*topic\s*:\s*(.*)$")
        .expect("header pattern is valid")
});

const BOM: char = '\u{feff}';

// (<item-id>) <text>
static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(([^()\s]+)\)\s*(.*)$").expect("item pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub item_number: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRecord {
    pub id: u64,
    pub topic: String,
    pub content: Vec<ContentItem>,
}

/// One classified line of the topic report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterLine {
    Header { index: u64, cluster_id: u64, topic: String },
    Item(ContentItem),
    Blank,
    /// Anything matching neither grammar rule; dropped without a report.
    Noise,
}

impl ClusterLine {
    pub fn classify(line: &str) -> Self {
        // A byte-order mark is not whitespace to `trim`
        let line = line.trim_start_matches(BOM).trim();
        if line.is_empty() {
            return ClusterLine::Blank;
        }

        if let Some(caps) = HEADER_RE.captures(line) {
            let topic = caps[3].trim();
            // Numbers too large for u64 or an empty topic make the header noise
            return match (caps[1].parse(), caps[2].parse()) {
                (Ok(index), Ok(cluster_id)) if !topic.is_empty() => ClusterLine::Header {
                    index,
                    cluster_id,
                    topic: topic.to_string(),
                },
                _ => ClusterLine::Noise,
            };
        }

        if let Some(caps) = ITEM_RE.captures(line) {
            return ClusterLine::Item(ContentItem {
                item_number: caps[1].to_string(),
                text: caps[2].trim().to_string(),
            });
        }

        ClusterLine::Noise
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClusterParseStats {
    pub headers: usize,
    pub items: usize,
    pub skipped: usize,
}

pub struct ClusterParser;

impl ClusterParser {
    pub fn parse_file(path: &Path) -> Result<IndexMap<u64, ClusterRecord>> {
        let content = FileReader::read_file(path)?;
        Ok(Self::parse_bytes(&content))
    }

    /// Parse a topic report. Keys keep the order in which cluster ids first appear.
    pub fn parse_str(text: &str) -> IndexMap<u64, ClusterRecord> {
        Self::parse_bytes(text.as_bytes())
    }

    /// Like `parse_str`, but a line that is not valid UTF-8 counts as noise
    /// instead of failing the whole report.
    pub fn parse_bytes(bytes: &[u8]) -> IndexMap<u64, ClusterRecord> {
        let mut clusters: IndexMap<u64, ClusterRecord> = IndexMap::new();
        let mut current: Option<u64> = None;
        let mut stats = ClusterParseStats::default();

        for raw in bytes.split(|&b| b == b'\n') {
            let line = match std::str::from_utf8(raw) {
                Ok(line) => ClusterLine::classify(line),
                Err(_) => ClusterLine::Noise,
            };

            match line {
                ClusterLine::Header { cluster_id, topic, .. } => {
                    stats.headers += 1;
                    // A repeated id restarts the record but keeps its slot
                    clusters.insert(
                        cluster_id,
                        ClusterRecord {
                            id: cluster_id,
                            topic,
                            content: Vec::new(),
                        },
                    );
                    current = Some(cluster_id);
                }
                ClusterLine::Item(item) => match current.and_then(|id| clusters.get_mut(&id)) {
                    Some(record) => {
                        stats.items += 1;
                        record.content.push(item);
                    }
                    None => stats.skipped += 1,
                },
                ClusterLine::Blank => {}
                ClusterLine::Noise => stats.skipped += 1,
            }
        }

        debug!(
            headers = stats.headers,
            items = stats.items,
            skipped = stats.skipped,
            clusters = clusters.len(),
            "Parsed cluster report"
        );

        clusters
    }
}
