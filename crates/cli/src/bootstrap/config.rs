use anyhow::Context;
use strata_dns_domain::{CliOverrides, Config};

/// Loads and validates configuration. Runs before logging is installed, so
/// failures are only reported through the returned error.
pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
