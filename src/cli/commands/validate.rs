//! Validate configuration command.

use anyhow::Result;
use chrono::Utc;
use reversal_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("File not found, using defaults and environment");
    }

    match config.validate(Utc::now().date_naive()) {
        Ok(()) => {
            println!("Configuration is valid!");
            println!();
            print!("{}", config.to_toml()?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
