//! PrintQuote CLI: run the quote pipeline against local files.
//!
//! Reads the same environment as the API server (PRUSA_SLICER_PATH, SLICER_PROFILE_PATH, ...).

use anyhow::Context;
use clap::{Parser, Subcommand};
use printquote_core::{AppError, Config, PricingTable, QuoteResponse};
use printquote_processing::{DurationExtractor, QuoteCalculator, QuotePipeline};
use printquote_cli::{duration_report, init_tracing, load_environment};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "printquote", about = "3D print time estimation and pricing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a mesh and price it
    Quote {
        /// Path to the STL/OBJ/3MF file
        mesh: PathBuf,
        /// Material identifier
        #[arg(long, default_value = "PLA")]
        material: String,
        /// Color identifier
        #[arg(long, default_value = "화이트")]
        color: String,
    },
    /// Read the estimated print time from an existing G-code file
    Duration {
        /// Path to the G-code file
        gcode: PathBuf,
    },
    /// Show material rates and color surcharges
    Pricing,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(load_environment(None));

    let cli = Cli::parse();

    match cli.command {
        Commands::Quote {
            mesh,
            material,
            color,
        } => {
            let config = Config::from_env().context("Invalid configuration")?;
            let pipeline =
                QuotePipeline::from_config(&config).context("Failed to build quote pipeline")?;

            let original_name = mesh
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| mesh.display().to_string());

            let quote = pipeline
                .quote(&mesh, &material, &color)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| {
                    AppError::DurationUnavailable(format!(
                        "No recognized print time annotation for {}",
                        mesh.display()
                    ))
                })?;

            print_json(&QuoteResponse::from_quote(quote, original_name))?;
        }
        Commands::Duration { gcode } => {
            let extractor = DurationExtractor::new()?;
            let calculator = QuoteCalculator::new(PricingTable::default())?;
            let report = duration_report(&extractor, &calculator, &gcode).await?;
            print_json(&report)?;
        }
        Commands::Pricing => {
            print_json(&PricingTable::default().summary())?;
        }
    }

    Ok(())
}
