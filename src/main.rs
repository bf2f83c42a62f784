//! priority-extractor - National priorities enrichment pipeline
//!
//! Looks up each row of a national priorities table in Europe PMC and writes
//! the enriched, flattened table.
//!
//! ## Usage
//!
//! ### Enrich the default table in place
//! ```bash
//! priority-extractor extract
//! ```
//!
//! ### Enrich into a separate file with a raw JSON dump
//! ```bash
//! priority-extractor extract --output data/enriched.csv --json data/enriched.json
//! ```
//!
//! ### Check a single lookup
//! ```bash
//! priority-extractor lookup --title "Effects of X on Y in Z Population Study"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use priority_extractor::config::DEFAULT_PRIORITIES_CSV;
use priority_extractor::europepmc::{EuropePmcClient, EPMC_SEARCH_URL};
use priority_extractor::{Extractor, ExtractorConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// National priorities enrichment pipeline - Europe PMC lookup and flat CSV export
#[derive(Parser)]
#[command(name = "priority-extractor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich every row of the priority table
    Extract {
        /// Priority table to read
        #[arg(short, long, default_value = DEFAULT_PRIORITIES_CSV)]
        input: PathBuf,

        /// Enriched table to write (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also dump the raw records as pretty-printed JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Search endpoint
        #[arg(long, default_value = EPMC_SEARCH_URL)]
        base_url: String,
    },

    /// Look up a single publication by identifier or title
    Lookup {
        /// Europe PMC identifier (exact match)
        #[arg(long, conflicts_with = "title", required_unless_present = "title")]
        id: Option<String>,

        /// Title (matched on its first seven words)
        #[arg(long)]
        title: Option<String>,

        /// Search endpoint
        #[arg(long, default_value = EPMC_SEARCH_URL)]
        base_url: String,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Extract {
            input,
            output,
            json,
            base_url,
        } => run_extract(input, output, json, base_url).await,
        Commands::Lookup { id, title, base_url } => run_lookup(id, title, base_url).await,
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn run_extract(
    input: PathBuf,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    base_url: String,
) -> Result<()> {
    let config = ExtractorConfig {
        output: output.unwrap_or_else(|| input.clone()),
        input,
        json_output: json,
        base_url,
    };

    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        "Starting extraction"
    );

    let extractor = Extractor::new(config).context("Invalid configuration")?;
    extractor.run().await.context("Extraction failed")?;

    println!("\n✓ Extraction complete. Results in: {}", extractor.config().output.display());
    Ok(())
}

async fn run_lookup(id: Option<String>, title: Option<String>, base_url: String) -> Result<()> {
    let client = EuropePmcClient::with_base_url(base_url)?;

    let publication = match (id, title) {
        (Some(id), _) => {
            println!("{}", client.search_url(&id));
            client.find_by_id(&id).await?
        }
        (None, Some(title)) => {
            println!("{}", client.search_url(&title));
            client.find_by_title(&title).await?
        }
        (None, None) => anyhow::bail!("Either --id or --title is required"),
    };

    match publication {
        Some(publication) => {
            let json = serde_json::to_string_pretty(&publication)
                .context("Failed to serialize publication")?;
            println!("{}", json);
        }
        None => println!("No paper found."),
    }

    Ok(())
}
