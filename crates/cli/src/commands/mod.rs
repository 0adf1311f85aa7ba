//! CLI commands for the transaction streaming client.

pub mod run;
pub mod seed;

pub use run::{run_stream, RunArgs};
pub use seed::{run_seed, SeedArgs};

use anyhow::Result;
use fraudops_core::{AppConfig, ConfigLoader};

/// Loads the layered configuration and applies a `--base-url` override.
pub(crate) fn load_config(path: &str, base_url: Option<&str>) -> Result<AppConfig> {
    let mut config = ConfigLoader::load_from(path)?;
    if let Some(base_url) = base_url {
        config.gateway.base_url = base_url.to_string();
    }
    Ok(config)
}
