use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::reader::FileReader;

// "(<digits>) topic ..." inside a from/to cell
static NODE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*(\d+)\s*\)\s*topic").expect("node reference pattern is valid")
});

/// Directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Single-character code deciding edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationCode {
    /// from -> to
    Cause,
    /// to -> from
    Effect,
}

impl RelationCode {
    pub fn parse(cell: &str) -> Option<Self> {
        match cell.trim() {
            "C" => Some(RelationCode::Cause),
            "E" => Some(RelationCode::Effect),
            _ => None,
        }
    }

    pub fn orient(self, from: u64, to: u64) -> Edge {
        match self {
            RelationCode::Cause => Edge::new(from.to_string(), to.to_string()),
            RelationCode::Effect => Edge::new(to.to_string(), from.to_string()),
        }
    }
}

/// Extract the node id embedded in a from/to cell. Leading zeros are
/// normalised away so ids compare equal to the cluster report's integers.
pub fn node_ref(cell: &str) -> Option<u64> {
    NODE_REF_RE.captures(cell).and_then(|caps| caps[1].parse().ok())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationTable {
    /// Deduplicated by directed pair, in first-seen row order.
    pub edges: Vec<Edge>,
    /// Every id on either side of an accepted row, including rows whose edge
    /// was a duplicate.
    pub connected_ids: BTreeSet<u64>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

pub struct RelationParser;

impl RelationParser {
    pub fn parse_file(path: &Path) -> Result<RelationTable> {
        let content = FileReader::read_file(path)?;
        Self::parse_bytes(&content)
            .with_context(|| format!("Failed to parse relation table: {:?}", path))
    }

    pub fn parse_str(text: &str) -> Result<RelationTable> {
        Self::parse_bytes(text.as_bytes())
    }

    /// Parse a header + rows table of `from, to, code, ...`.
    ///
    /// Rows with fewer than three fields, a cell that is not valid UTF-8, an
    /// unparseable side, or an unrecognised code are skipped. Only a broken
    /// CSV stream is an error.
    pub fn parse_bytes(bytes: &[u8]) -> Result<RelationTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut table = RelationTable::default();
        let mut seen: HashSet<Edge> = HashSet::new();

        for record in reader.byte_records() {
            let record = record.context("Malformed relation table stream")?;
            table.rows_read += 1;

            let cell = |i: usize| record.get(i).and_then(|field| std::str::from_utf8(field).ok());
            let parsed = match (cell(0), cell(1), cell(2)) {
                (Some(from), Some(to), Some(code)) => node_ref(from)
                    .zip(node_ref(to))
                    .zip(RelationCode::parse(code)),
                _ => None,
            };

            let Some(((from, to), code)) = parsed else {
                table.rows_skipped += 1;
                continue;
            };

            table.connected_ids.insert(from);
            table.connected_ids.insert(to);

            let edge = code.orient(from, to);
            if seen.insert(edge.clone()) {
                table.edges.push(edge);
            }
        }

        debug!(
            rows = table.rows_read,
            skipped = table.rows_skipped,
            edges = table.edges.len(),
            connected = table.connected_ids.len(),
            "Parsed relation table"
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "node_i,node_j,relation\n";

    fn parse(rows: &str) -> RelationTable {
        RelationParser::parse_str(&format!("{HEADER}{rows}")).unwrap()
    }

    #[test]
    fn test_codes_decide_direction() {
        let table = parse("(5) topic : Alpha,(7) topic : Beta,C\n(1) topic : X,(2) topic : Y,E\n");

        assert_eq!(table.edges, vec![Edge::new("5", "7"), Edge::new("2", "1")]);
        assert_eq!(table.connected_ids, BTreeSet::from([1, 2, 5, 7]));
    }

    #[test]
    fn test_dedup_is_per_directed_pair() {
        let rows = "\
(5) topic : A,(7) topic : B,C
(5) topic : A,(7) topic : B,C
(7) topic : B,(5) topic : A,E
(7) topic : B,(5) topic : A,C
";
        let table = parse(rows);

        // Rows 1-3 all produce 5 -> 7; row 4 produces the reverse pair
        assert_eq!(table.edges, vec![Edge::new("5", "7"), Edge::new("7", "5")]);
    }

    #[test]
    fn test_unparseable_rows_are_skipped() {
        let rows = "\
(5) topic : A,no id here,C
(5) topic : A,(7) topic : B,X
short,row
(8) topic : C,(9) topic : D,C,extra,columns
";
        let table = parse(rows);

        assert_eq!(table.edges, vec![Edge::new("8", "9")]);
        assert_eq!(table.connected_ids, BTreeSet::from([8, 9]));
        assert_eq!(table.rows_read, 4);
        assert_eq!(table.rows_skipped, 3);
    }

    #[test]
    fn test_quoted_cells_and_leading_zeros() {
        let table = parse("\"(05) topic : a, b\",\"(7) topic : c\",C\n");

        assert_eq!(table.edges, vec![Edge::new("5", "7")]);
    }

    #[test]
    fn test_duplicate_row_still_counts_its_ids() {
        let table = parse("(1) topic : A,(2) topic : B,C\n(1) topic : A,(2) topic : B,C\n");

        assert_eq!(table.edges.len(), 1);
        assert_eq!(table.rows_skipped, 0);
        assert_eq!(table.connected_ids.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.csv");
        std::fs::write(
            &path,
            b"node_i,node_j,relation\n(5) topic : A,(7) topic : B,C\n(1) topic : \xff,(2) topic : Y,C\n(8) topic : C,(9) topic : D,E\n",
        )
        .unwrap();

        let table = RelationParser::parse_file(&path).unwrap();

        assert_eq!(table.edges, vec![Edge::new("5", "7"), Edge::new("9", "8")]);
        assert_eq!(table.connected_ids, BTreeSet::from([5, 7, 8, 9]));
        assert_eq!(table.rows_read, 3);
        assert_eq!(table.rows_skipped, 1);
    }

    #[test]
    fn test_node_ref() {
        assert_eq!(node_ref("(42) topic : anything"), Some(42));
        assert_eq!(node_ref("(42) cluster"), None);
        assert_eq!(node_ref("topic 42"), None);
    }
}
