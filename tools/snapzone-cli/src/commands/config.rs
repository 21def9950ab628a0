//! Show or initialize configuration.

use anyhow::{bail, Context};
use snapzone_common::config::{config_file_path, AppConfig};

pub fn run(init: bool, force: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if init {
        if path.exists() && !force {
            bail!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        let written = AppConfig::default()
            .save()
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Wrote default config to {}", written.display());
        return Ok(());
    }

    // Report a broken file instead of silently showing defaults.
    let config = AppConfig::try_load_from(&path)?;
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
