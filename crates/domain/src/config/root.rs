use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;

/// Main configuration structure for Ferrous Lookup
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-lookup.toml in current directory
    /// 3. /etc/ferrous-lookup/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(server) = overrides.dns_server {
            self.resolver.address = Some(server);
        }
        if let Some(network) = overrides.network {
            self.resolver.network = network;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolver = &self.resolver;

        if resolver.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.timeout_ms cannot be 0".to_string(),
            ));
        }

        if resolver.default_port == 0 {
            return Err(ConfigError::Validation(
                "resolver.default_port cannot be 0".to_string(),
            ));
        }

        if resolver.max_cname_depth == 0 {
            return Err(ConfigError::Validation(
                "resolver.max_cname_depth cannot be 0".to_string(),
            ));
        }

        if resolver.network.is_encrypted()
            && resolver.server_name.is_none()
            && resolver.resolver_address().is_none()
        {
            return Err(ConfigError::Validation(format!(
                "network '{}' needs resolver.server_name or resolver.address",
                resolver.network
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if Path::new("ferrous-lookup.toml").exists() {
            Some("ferrous-lookup.toml".to_string())
        } else if Path::new("/etc/ferrous-lookup/config.toml").exists() {
            Some("/etc/ferrous-lookup/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_server: Option<String>,
    pub network: Option<crate::network::Network>,
    pub log_level: Option<String>,
}
