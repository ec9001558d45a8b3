use anyhow::Result;
use dataset::{Dataset, DatasetBuilder};
use graph::{Assembly, CanonicalGraph, Diagnostics, GraphAssembler};
use ingest::InputPaths;
use layout::{GraphMetrics, LayoutEngine, ScoringEngine, select_backend};
use tracing::info;

use crate::config::PipelineConfig;

/// Output of the layout-to-dataset half.
#[derive(Debug, Clone)]
pub struct Built {
    pub dataset: Dataset,
    pub metrics: GraphMetrics,
    pub diagnostics: Diagnostics,
}

/// Output of a full run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub graph: CanonicalGraph,
    pub dataset: Dataset,
    pub diagnostics: Diagnostics,
}

/// Batch transform: parse -> assemble -> layout -> score -> dataset.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse both sources and build the canonical graph. Only an unreadable
    /// input is an error.
    pub fn assemble(&self, paths: &InputPaths) -> Result<Assembly> {
        let sources = ingest::ingest_sources(paths)?;
        let assembler = GraphAssembler::new(self.config.graph.clone());

        Ok(assembler.assemble(&sources.clusters, &sources.relations))
    }

    /// Lay out, score and map a canonical graph into the dataset shape.
    pub fn build(&self, graph: &CanonicalGraph) -> Built {
        let mut diagnostics = Diagnostics::new();

        // Provider selection happens here, once for the run
        let selection = select_backend(&self.config.layout);
        selection.report(&mut diagnostics);
        let seed = self.config.layout.seed;
        let layout_engine = LayoutEngine::with_algorithms(selection.clone(), seed);
        let scoring_engine = ScoringEngine::with_algorithms(selection, seed);
        info!(
            layout = layout_engine.backend_name(),
            scoring = scoring_engine.backend_name(),
            "Selected graph backends"
        );

        let metrics = GraphMetrics {
            positions: layout_engine.compute(graph, &mut diagnostics),
            scores: scoring_engine.compute(graph, &mut diagnostics),
        };

        let dataset = DatasetBuilder::new(self.config.dataset.clone())
            .build(graph, &metrics, &mut diagnostics);

        Built {
            dataset,
            metrics,
            diagnostics,
        }
    }

    pub fn run(&self, paths: &InputPaths) -> Result<RunOutput> {
        let Assembly {
            graph,
            mut diagnostics,
        } = self.assemble(paths)?;

        let built = self.build(&graph);
        diagnostics.extend(built.diagnostics);

        Ok(RunOutput {
            graph,
            dataset: built.dataset,
            diagnostics,
        })
    }
}
