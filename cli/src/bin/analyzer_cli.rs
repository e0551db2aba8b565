use clap::{Parser, Subcommand};
use cli::{configure, roi_preview, variant_reports};
use color_eyre::eyre::{Result, eyre};
use image_analyzer::{AnalysisConfig, AnalyzerRegistry, Point, Size};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered analyzer variants and the parameters they accept
    Variants,
    /// Print the JSON schema of the analysis configuration file
    Schema,
    /// Configure an analyzer from a JSON or TOML file and report its state
    Configure {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the effective region of interest for an input image
    Roi {
        /// Path to the input image
        #[arg(short, long)]
        input: PathBuf,
        /// ROI lower left corner, x coordinate
        #[arg(long, requires = "y")]
        x: Option<i32>,
        /// ROI lower left corner, y coordinate
        #[arg(long, requires = "x")]
        y: Option<i32>,
        /// ROI width
        #[arg(long, requires = "height")]
        width: Option<i32>,
        /// ROI height
        #[arg(long, requires = "width")]
        height: Option<i32>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();
    let registry = AnalyzerRegistry::with_builtin();

    match &cli.command {
        Commands::Variants => {
            let reports = variant_reports(&registry)?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&AnalysisConfig::schema())?);
        }
        Commands::Configure { config } => {
            configure_from_file(config, &registry)?;
        }
        Commands::Roi { input, x, y, width, height } => {
            let origin = x.zip(*y).map(|(x, y)| Point::new(x, y));
            let size = width.zip(*height).map(|(w, h)| Size::new(w, h));
            match roi_preview(input, origin, size)? {
                Some(roi) => println!("{}", serde_json::to_string_pretty(&roi)?),
                None => return Err(eyre!("the requested ROI does not intersect {:?}", input)),
            }
        }
    }

    Ok(())
}

fn configure_from_file(config_path: &Path, registry: &AnalyzerRegistry) -> Result<()> {
    let config = AnalysisConfig::from_file(config_path)?;
    info!("Configuring '{}' analyzer from {:?}", config.variant, config_path);

    match configure(&config, registry) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            if let Some(status) = e.status() {
                error!("Analyzer rejected the configuration with status '{}'", status);
            }
            Err(e.into())
        }
    }
}
