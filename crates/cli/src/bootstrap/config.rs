use anyhow::Context;
use ferrous_lookup_domain::{CliOverrides, Config};
use tracing::debug;

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    debug!(
        network = %config.resolver.network,
        timeout_ms = config.resolver.timeout_ms,
        "Configuration loaded"
    );
    Ok(config)
}
