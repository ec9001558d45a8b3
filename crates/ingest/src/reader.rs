use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional file names used when only an input directory is given.
pub const CLUSTER_FILE_NAME: &str = "cluster.txt";
pub const RELATION_FILE_NAME: &str = "graph.csv";

pub struct FileReader;

impl FileReader {
    /// Read a whole source document as raw bytes. Decoding is left to the
    /// parsers so one bad byte only costs its own line.
    ///
    /// The `std::io::Error` stays attached as the error source so callers can
    /// tell a missing file apart.
    pub fn read_file(path: &Path) -> Result<Vec<u8>> {
        let content = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(content)
    }
}

/// Locations of the two source artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub clusters: PathBuf,
    pub relations: PathBuf,
}

impl InputPaths {
    pub fn new(clusters: impl Into<PathBuf>, relations: impl Into<PathBuf>) -> Self {
        Self {
            clusters: clusters.into(),
            relations: relations.into(),
        }
    }

    /// Resolve `cluster.txt` and `graph.csv` inside `dir`, failing if either is absent.
    pub fn discover(dir: &Path) -> Result<Self> {
        let paths = Self::new(dir.join(CLUSTER_FILE_NAME), dir.join(RELATION_FILE_NAME));
        paths.ensure_exist()?;
        Ok(paths)
    }

    /// Fill whichever of the two paths was not given explicitly from `dir`.
    pub fn resolve(
        clusters: Option<PathBuf>,
        relations: Option<PathBuf>,
        dir: Option<&Path>,
    ) -> Result<Self> {
        let base = dir.map(Path::to_path_buf).unwrap_or_default();

        let paths = Self::new(
            clusters.unwrap_or_else(|| base.join(CLUSTER_FILE_NAME)),
            relations.unwrap_or_else(|| base.join(RELATION_FILE_NAME)),
        );
        paths.ensure_exist()?;
        Ok(paths)
    }

    fn ensure_exist(&self) -> Result<()> {
        for path in [&self.clusters, &self.relations] {
            // metadata() carries the io::ErrorKind through to the caller
            fs::metadata(path).with_context(|| format!("Input file not found: {:?}", path))?;
        }
        Ok(())
    }
}
