//! Show or create the configuration file.

use suitme_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if init {
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("  (not present, using defaults)");
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
