use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cli::{Pipeline, PipelineConfig};
use graph::{CanonicalGraph, Diagnostics};
use ingest::InputPaths;
use layout::BackendMode;
use std::path::PathBuf;
use tracing::info;

/// Turn a clustered-topic report and a relation table into a graph dataset
#[derive(Parser, Debug)]
#[command(name = "topicgraph", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON pipeline config; flags below override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Skip the graph library and use the concentric-ring layout
    #[arg(long, global = true)]
    native: bool,

    /// Seed for layout, fallback scores and edge sampling
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Share of edges kept in the dataset, in (0, 1]
    #[arg(long, global = true)]
    edge_retention: Option<f64>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Args, Debug)]
struct Inputs {
    /// Topic report (default: <input-dir>/cluster.txt)
    #[arg(long)]
    clusters: Option<PathBuf>,

    /// Relation table (default: <input-dir>/graph.csv)
    #[arg(long)]
    relations: Option<PathBuf>,

    /// Directory holding cluster.txt and graph.csv
    #[arg(long)]
    input_dir: Option<PathBuf>,
}

impl Inputs {
    fn resolve(self) -> Result<InputPaths> {
        InputPaths::resolve(self.clusters, self.relations, self.input_dir.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse both sources and write the canonical graph
    Assemble {
        #[command(flatten)]
        inputs: Inputs,

        #[arg(short, long, default_value = "data.json")]
        output: PathBuf,
    },
    /// Lay out and score a canonical graph, then write the dataset
    Build {
        #[arg(short, long, default_value = "data.json")]
        graph: PathBuf,

        #[arg(short, long, default_value = "dataset.json")]
        output: PathBuf,
    },
    /// Run every stage
    Run {
        #[command(flatten)]
        inputs: Inputs,

        /// Also write the canonical graph here
        #[arg(long)]
        graph_output: Option<PathBuf>,

        #[arg(short, long, default_value = "dataset.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = load_config(&cli)?;
    let pipeline = Pipeline::new(config);

    let diagnostics = match cli.command {
        Command::Assemble { inputs, output } => {
            let assembly = pipeline.assemble(&inputs.resolve()?)?;
            assembly.graph.write_json(&output)?;
            info!(path = ?output, "Wrote canonical graph");
            assembly.diagnostics
        }
        Command::Build { graph, output } => {
            let graph = CanonicalGraph::read_json(&graph)?;
            let built = pipeline.build(&graph);
            built.dataset.write_json(&output)?;
            info!(path = ?output, "Wrote dataset");
            built.diagnostics
        }
        Command::Run {
            inputs,
            graph_output,
            output,
        } => {
            let run = pipeline.run(&inputs.resolve()?)?;
            if let Some(path) = graph_output {
                run.graph.write_json(&path)?;
                info!(path = ?path, "Wrote canonical graph");
            }
            run.dataset.write_json(&output)?;
            info!(path = ?output, "Wrote dataset");
            run.diagnostics
        }
    };

    report(&diagnostics);
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    if cli.native {
        config.layout.backend = BackendMode::Native;
    }
    if let Some(seed) = cli.seed {
        config.layout.seed = seed;
        config.dataset.seed = seed;
    }
    if let Some(ratio) = cli.edge_retention {
        config.dataset.edge_retention = ratio;
    }

    config.validate()?;
    Ok(config)
}

fn report(diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        info!("No consistency issues found");
        return;
    }

    for (kind, count) in diagnostics.summary() {
        info!(kind, count, "Diagnostics summary");
    }
}
