// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridPulse.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gridpulse_types::WeeklyMetric;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridpulse_server::app;
use gridpulse_server::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "gridpulse-server")]
#[command(about = "UK electricity demand dashboard backend", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./gridpulse.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the electricity API
    Electricity,
    /// Run the gas API stub
    Gas,
    /// Run the orchestrator serving the frontend bundle
    Main,
    /// Run all three services in one process
    All,
    /// Compute the weekly national demand file and print a preview
    GenerateNd,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gridpulse_server=info,gridpulse_core=info")),
        )
        .init();

    let cli = Cli::parse();
    if let Some(path) = &cli.config {
        info!(path = %path.display(), "Loading configuration");
    }
    let config = Arc::new(AppConfig::load(cli.config.as_deref())?);

    match cli.command {
        Command::Electricity => app::run_electricity(config).await,
        Command::Gas => app::run_gas(config).await,
        Command::Main => app::run_main(config).await,
        Command::All => app::run_all(config).await,
        Command::GenerateNd => generate_nd(&config).await,
    }
}

async fn generate_nd(config: &AppConfig) -> anyhow::Result<()> {
    let service = app::electricity_service(config);
    let cached = service
        .refresh_weekly(WeeklyMetric::NationalDemand)
        .await
        .context("Failed to generate national demand averages")?;

    println!("ND data generation completed");
    println!("Total weeks processed: {}", cached.data.len());
    match &cached.path {
        Some(path) => println!("File saved to: {}", path.display()),
        None => println!("Averages were computed but could not be written, see log"),
    }
    println!();
    println!("First 5 weeks:");
    for week in cached.data.iter().take(5) {
        println!(
            "  {}  average {:>10.2}  total {:>14.2}  ({} periods)",
            week.week_start, week.average, week.total, week.count
        );
    }
    Ok(())
}
