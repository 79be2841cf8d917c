//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `OPS_CONSOLE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use ops_console::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.logging.init_tracing();
//!
//! println!("Live updates from {}", config.live_sync.endpoint);
//! ```

mod error;
mod grid;
mod live_sync;
mod logging;
mod row_source;

pub use error::{ConfigError, ValidationError};
pub use grid::{GridConfig, MAX_ITEMS_PER_PAGE};
pub use live_sync::LiveSyncConfig;
pub use logging::LoggingConfig;
pub use row_source::RowSourceConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// development configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Data grid defaults (page size)
    #[serde(default)]
    pub grid: GridConfig,

    /// Push channel settings
    #[serde(default)]
    pub live_sync: LiveSyncConfig,

    /// REST collection endpoints
    #[serde(default)]
    pub row_source: RowSourceConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `OPS_CONSOLE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `OPS_CONSOLE__GRID__ITEMS_PER_PAGE=25` -> `grid.items_per_page = 25`
    /// - `OPS_CONSOLE__LIVE_SYNC__ENDPOINT=wss://...` -> `live_sync.endpoint = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("OPS_CONSOLE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.grid.validate()?;
        self.live_sync.validate()?;
        self.row_source.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}
