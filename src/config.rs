//! Configuration module for loading and parsing TOML configuration files.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Upstream data source configuration.
    pub upstream: UpstreamConfig,
    /// Scan behavior configuration.
    pub scan: ScanConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Upstream data source configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the option-chain source.
    pub base_url: String,
    /// Per-request timeout in seconds for chain fetches.
    pub request_timeout_secs: u64,
    /// Timeout in seconds for session warm-up requests.
    pub prime_timeout_secs: u64,
    /// Maximum fetch attempts before giving up on a symbol.
    pub max_attempts: u32,
    /// Delay between fetch attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com".to_string(),
            request_timeout_secs: 12,
            prime_timeout_secs: 10,
            max_attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

/// Scan behavior configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Delay before each symbol's fetch in milliseconds, throttling upstream load.
    pub symbol_throttle_ms: u64,
    /// Default IV breakout threshold.
    pub default_threshold: f64,
    /// Default realtime push interval in seconds.
    pub default_interval_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            symbol_throttle_ms: 150,
            default_threshold: 5.0,
            default_interval_secs: 15,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.base_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "upstream base_url cannot be empty".to_string(),
            ));
        }
        if self.upstream.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "upstream max_attempts must be at least 1".to_string(),
            ));
        }
        if self.upstream.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "upstream request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.scan.default_threshold < 0.0 {
            return Err(ConfigError::InvalidValue(
                "scan default_threshold must be >= 0".to_string(),
            ));
        }
        if self.scan.default_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "scan default_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 3000

[upstream]
base_url = "https://www.nseindia.com"
request_timeout_secs = 12
prime_timeout_secs = 10
max_attempts = 3
retry_delay_ms = 500

[scan]
symbol_throttle_ms = 150
default_threshold = 5.0
default_interval_secs = 15
"#;

        let config = Config::parse(toml_content).expect("should parse");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.max_attempts, 3);
        assert_eq!(config.scan.symbol_throttle_ms, 150);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = Config::parse("[server]\nport = 9000\n").expect("should parse");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.upstream.base_url, "https://www.nseindia.com");
        assert_eq!(config.scan.default_interval_secs, 15);
    }

    #[test]
    fn test_validation_rejects_zero_attempts() {
        assert!(Config::parse("[upstream]\nmax_attempts = 0\n").is_err());
    }

    #[test]
    fn test_validation_rejects_negative_threshold() {
        assert!(Config::parse("[scan]\ndefault_threshold = -1.0\n").is_err());
    }
}
