//! Seed command.
//!
//! Asks the scoring service to refill its pending queue with a fresh batch of
//! demo transactions.

use anyhow::{Context, Result};
use clap::Args;
use fraudops_core::DEFAULT_CONFIG_PATH;
use fraudops_gateway::ScoringClient;

/// Arguments for the seed command.
#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Scoring service base URL (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Runs the seed command.
///
/// # Errors
/// Returns an error if configuration cannot be loaded or the seed request fails.
pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let config = super::load_config(&args.config, args.base_url.as_deref())?;
    let client = ScoringClient::new(config.gateway)
        .context("Failed to create scoring service client")?;

    let report = client
        .seed()
        .await
        .with_context(|| format!("Failed to seed transactions at {}", client.base_url()))?;

    tracing::info!(created = report.transactions_created, "Queue seeded");
    println!("{} ({} transactions created)", report.message, report.transactions_created);

    Ok(())
}
