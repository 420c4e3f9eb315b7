//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geo_enrich` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use geo_enrich::initialization::init_logger_with;
use geo_enrich::{run_enrichment, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (GOOGLE_MAPS_API_KEY) from the current directory, falling back
    // to the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_enrichment(config).await {
        Ok(report) => {
            println!(
                "✅ Processed {} job{} ({} located, {} without location, {} dropped) in {:.1}s",
                report.total_jobs,
                if report.total_jobs == 1 { "" } else { "s" },
                report.located,
                report.without_location,
                report.dropped,
                report.elapsed_seconds
            );
            println!("Locations saved in {}", report.db_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("geo_enrich error: {:#}", e);
            process::exit(1);
        }
    }
}
