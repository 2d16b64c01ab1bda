use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use roadnet::{Pipeline, PipelineConfig, SegmentMap};
use roadnet_cli::BatchJob;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the segment network of one image and print it as JSON
    Extract {
        /// Path to the input image
        #[arg(short, long)]
        input: PathBuf,
        /// Sampling stride in pixels (overrides the config file)
        #[arg(short, long)]
        epsilon: Option<usize>,
        /// Pipeline configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also write the network as GeoJSON to this path
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Process every image listed in a job file
    Batch {
        /// Path to the job file (.toml or .json)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the JSON schema of the batch job file
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, epsilon, config, geojson, pretty } => {
            extract(&input, epsilon, config.as_deref(), geojson.as_deref(), pretty)?;
        }
        Commands::Batch { config } => {
            batch(&config)?;
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(BatchJob);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn extract(
    input: &Path,
    epsilon: Option<usize>,
    config_path: Option<&Path>,
    geojson: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(epsilon) = epsilon {
        config.epsilon = epsilon;
    }

    let pipeline = Pipeline::from_config(&config)?;
    info!("{}", pipeline.info());

    let network = pipeline.process_path(input)?;
    let map = SegmentMap::from_network(&network);
    let json = if pretty {
        map.to_json_string_pretty()?
    } else {
        map.to_json_string()?
    };
    println!("{json}");

    if let Some(path) = geojson {
        std::fs::write(path, network.to_geojson_string()?)?;
        info!("GeoJSON written to {}", path.display());
    }

    Ok(())
}

fn batch(job_path: &Path) -> Result<()> {
    let job = BatchJob::from_file(job_path)?;
    info!("Batch job: {} images -> {}", job.images.len(), job.output_dir);

    let report = job.run()?;
    for path in &report.written {
        info!("Wrote {}", path.display());
    }

    if report.is_success() {
        Ok(())
    } else {
        let names: Vec<&str> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
        Err(eyre!("{} image(s) failed: {}", names.len(), names.join(", ")))
    }
}
