/*!
 * Configuration management for redstrip.
 *
 * Settings are layered: built-in defaults, then an optional configuration
 * file, then environment variables with the `REDSTRIP_` prefix (using `__`
 * to separate sections, e.g. `REDSTRIP_SERVER__PORT=8080`).
 */
use std::path::Path;

use config::{Config as ConfigLib, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Top-level redstrip configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Device connection configuration
    #[serde(default)]
    pub device: DeviceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Device connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Address of the power strip; auto-discover on the local network when unset
    #[serde(default)]
    pub address: Option<String>,

    /// Discovery timeout in seconds
    #[serde(default = "default_discovery_timeout_secs")]
    pub discovery_timeout_secs: u64,

    /// Per-operation I/O timeout in seconds for refresh and commands
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            device: DeviceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: None,
            discovery_timeout_secs: default_discovery_timeout_secs(),
            io_timeout_secs: default_io_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_discovery_timeout_secs() -> u64 {
    5
}

fn default_io_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from an optional file and the environment
    ///
    /// Missing files are not an error; defaults apply for everything not set.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let default_config = Config::default();
        let mut builder = ConfigLib::builder().add_source(
            config::Config::try_from(&default_config)
                .map_err(|e| Error::config(format!("Failed to create default config: {}", e)))?,
        );

        if let Some(path) = config_file {
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(File::from(path));
            } else {
                debug!(
                    "Configuration file {} does not exist, using defaults",
                    path.display()
                );
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("REDSTRIP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build configuration: {}", e)))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(config.device.address.is_none());
        assert_eq!(config.device.io_timeout_secs, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test_log::test]
    fn test_load_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.server.port, 5000);
    }
}
