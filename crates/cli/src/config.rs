use anyhow::{Context, Result, bail};
use dataset::DatasetConfig;
use graph::AssemblerConfig;
use layout::{BackendMode, LayoutConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub graph: AssemblerConfig,
    pub layout: LayoutConfig,
    pub dataset: DatasetConfig,
}

impl PipelineConfig {
    /// Native backend only: identical output whether or not the graph
    /// library is compiled in.
    pub fn deterministic() -> Self {
        Self {
            layout: LayoutConfig {
                backend: BackendMode::Native,
                ..LayoutConfig::default()
            },
            ..Self::default()
        }
    }

    /// Keep roughly half the edges for a less cluttered picture.
    pub fn sparse() -> Self {
        Self {
            dataset: DatasetConfig {
                edge_retention: 0.5,
                ..DatasetConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let retention = self.dataset.edge_retention;
        if !(retention > 0.0 && retention <= 1.0) {
            bail!("edge_retention must be in (0, 1], got {}", retention);
        }
        if self.layout.repulsion <= 0.0 || !self.layout.repulsion.is_finite() {
            bail!("layout repulsion must be positive, got {}", self.layout.repulsion);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"layout": {"backend": "native"}, "dataset": {"edge_retention": 0.5}}"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.layout.backend, BackendMode::Native);
        assert_eq!(config.layout.seed, 42);
        assert_eq!(config.dataset.edge_retention, 0.5);
        assert_eq!(config.graph.default_category, "Default Behaviour");
    }

    #[test]
    fn test_rejects_bad_retention() {
        let mut config = PipelineConfig::default();
        config.dataset.edge_retention = 0.0;
        assert!(config.validate().is_err());

        config.dataset.edge_retention = 1.5;
        assert!(config.validate().is_err());

        assert!(PipelineConfig::sparse().validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(PipelineConfig::deterministic().layout.backend, BackendMode::Native);
        assert_eq!(PipelineConfig::sparse().dataset.edge_retention, 0.5);
        assert_eq!(PipelineConfig::default().layout.backend, BackendMode::Auto);
    }
}
