use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the TOML configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

/// Environment variable prefix; nested keys use `__` (e.g. `FRAUDOPS_STREAM__MAX_CYCLES`).
pub const ENV_PREFIX: &str = "FRAUDOPS_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from the default TOML path and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or a value has the wrong type.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration by layering built-in defaults, the TOML file at
    /// `path` (skipped if missing), and `FRAUDOPS_` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or a value has the wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::figment(path)
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        tracing::debug!(
            base_url = %config.gateway.base_url,
            max_cycles = config.stream.max_cycles,
            pacing_ms = config.stream.pacing_ms,
            "Configuration loaded"
        );

        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
