pub mod cluster;
pub mod reader;
pub mod relation;

pub use cluster::{ClusterLine, ClusterParser, ClusterRecord, ContentItem};
pub use reader::{FileReader, InputPaths};
pub use relation::{Edge, RelationCode, RelationParser, RelationTable};

use anyhow::Result;
use indexmap::IndexMap;

/// Both parsed sources, ready for assembly.
#[derive(Debug, Clone)]
pub struct ParsedSources {
    pub clusters: IndexMap<u64, ClusterRecord>,
    pub relations: RelationTable,
}

/// Main ingestion step: read and parse the topic report and the relation table
pub fn ingest_sources(paths: &InputPaths) -> Result<ParsedSources> {
    let clusters = ClusterParser::parse_file(&paths.clusters)?;
    let relations = RelationParser::parse_file(&paths.relations)?;

    tracing::info!(
        clusters = clusters.len(),
        edges = relations.edges.len(),
        "Ingested sources"
    );

    Ok(ParsedSources { clusters, relations })
}
