use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::zone::ZoneConfig;
use crate::domain_name::is_in_zone;

const LOCAL_RECORD_TYPES: [&str; 4] = ["A", "AAAA", "CNAME", "TXT"];

/// Main configuration structure for Strata DNS
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Served zones, each with its own handler chain
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            zones: default_zones(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. strata-dns.toml in current directory
    /// 3. /etc/strata-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("strata-dns.toml").exists() {
            Self::from_file("strata-dns.toml")?
        } else if std::path::Path::new("/etc/strata-dns/config.toml").exists() {
            Self::from_file("/etc/strata-dns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.zones.is_empty() {
            return Err(ConfigError::Validation("No zones configured".to_string()));
        }

        let mut seen = HashSet::new();
        for zone in &self.zones {
            let origin = zone.origin();
            if !seen.insert(origin.clone()) {
                return Err(ConfigError::Validation(format!(
                    "Zone '{}' is configured more than once",
                    origin
                )));
            }

            if let Some(cache) = &zone.cache {
                cache.validate().map_err(|e| match e {
                    ConfigError::Validation(msg) => {
                        ConfigError::Validation(format!("zone '{}': {}", origin, msg))
                    }
                    other => other,
                })?;
            }

            for record in &zone.records {
                let rtype = record.record_type.to_ascii_uppercase();
                if !LOCAL_RECORD_TYPES.contains(&rtype.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "zone '{}': unsupported record type '{}' for '{}'",
                        origin, record.record_type, record.name
                    )));
                }
                let fqdn = record.fqdn(&origin);
                if !is_in_zone(&fqdn, &origin) {
                    return Err(ConfigError::Validation(format!(
                        "zone '{}': record '{}' is outside the zone",
                        origin, fqdn
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}

fn default_zones() -> Vec<ZoneConfig> {
    vec![ZoneConfig {
        zone: ".".to_string(),
        cache: Some(CacheConfig::default()),
        records: vec![],
    }]
}
