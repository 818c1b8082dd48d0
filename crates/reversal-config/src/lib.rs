//! Configuration management.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML
//! file, then `REVERSAL__SECTION__KEY` environment variables. Command-line
//! flags are applied on top by the binary.

mod settings;

pub use settings::{AppConfig, AppSettings, BacktestSettings, LoggingConfig, OutputSettings};

use config::{Config, Environment, File};
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "REVERSAL";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to render configuration: {0}")]
    Render(String),
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from file and environment.
///
/// A missing file is not an error; defaults apply.
pub fn load_config(path: &Path) -> Result<AppConfig, SettingsError> {
    load_with_env(path, environment())
}

fn load_with_env(path: &Path, env: Environment) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(env)
        .build()?;

    Ok(config.try_deserialize()?)
}
