// src/config/mod.rs
mod schema;

use std::path::{Path, PathBuf};
use config::{Config as ConfigLoader, FileFormat};
use tracing::{info, warn};

pub use schema::{Config, RunConfig, ExecutorConfig};

use crate::error::{KempnerResult, KempnerError};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Centralized configuration handling
impl Config {
    /// Load configuration from built-in defaults, a file and the environment
    pub fn load(config_path: Option<&Path>) -> KempnerResult<Self> {
        info!("Loading configuration");

        let mut config_builder = ConfigLoader::builder();

        // Default configuration
        config_builder = config_builder.add_source(
            config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml)
        );

        // User-provided configuration
        if let Some(path) = config_path {
            if path.exists() {
                config_builder = config_builder.add_source(config::File::from(path));
                info!("Loading user configuration from: {}", path.display());
            } else {
                warn!("Specified configuration file not found: {}", path.display());
            }
        } else {
            let default_path = Self::get_default_config_path();
            if default_path.exists() {
                config_builder = config_builder.add_source(config::File::from(default_path.as_path()));
                info!("Loading default configuration from: {}", default_path.display());
            }
        }

        // Environment variables, e.g. KEMPNER_RUN__N
        config_builder = config_builder.add_source(
            config::Environment::with_prefix("KEMPNER")
                .prefix_separator("_")
                .separator("__")
        );

        let config: Config = config_builder
            .build()
            .map_err(|e| KempnerError::ConfigError(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| KempnerError::ConfigError(format!("Failed to parse configuration: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration path
    pub fn get_default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".kempner/config.toml")
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> KempnerResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| KempnerError::SerializationError(format!("Failed to serialize configuration: {}", e)))
    }
}
