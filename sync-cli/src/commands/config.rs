//! Print the effective configuration.

use anyhow::{Context, Result};
use pagesync_client::ClientConfig;

/// Run the config command.
pub fn run(config: &ClientConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &ClientConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration")
}
