//! Server configuration.

use crate::error::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Runtime settings for the relay server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Adopt peer-computed snapshots instead of recomputing the move.
    #[serde(default)]
    trust_client_state: bool,

    /// Seconds a turn-holder may stall before forfeiting. Unset disables it.
    #[serde(default)]
    turn_timeout_secs: Option<u64>,

    /// Seconds between idle sweeps.
    #[serde(default = "default_sweep_interval")]
    sweep_interval_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_sweep_interval() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
            trust_client_state: false,
            turn_timeout_secs: None,
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::new("sweep_interval_secs must be positive"));
        }
        if self.turn_timeout_secs == Some(0) {
            return Err(ConfigError::new("turn_timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Applies command-line overrides. `None` keeps the loaded value.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        turn_timeout_secs: Option<u64>,
        trust_client_state: bool,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if turn_timeout_secs.is_some() {
            self.turn_timeout_secs = turn_timeout_secs;
        }
        self.trust_client_state |= trust_client_state;
        self.validate()?;
        Ok(self)
    }

    /// Idle timeout, if enabled.
    pub fn turn_timeout(&self) -> Option<Duration> {
        self.turn_timeout_secs.map(Duration::from_secs)
    }

    /// Interval between idle sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 4100\nturn_timeout_secs = 30").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.port(), 4100);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.turn_timeout(), Some(Duration::from_secs(30)));
        assert!(!config.trust_client_state());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prot = 4100").unwrap();
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::from_file("/nonexistent/twixt.toml").unwrap_err();
        assert!(err.message.contains("Failed to read"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::default()
            .with_overrides(Some("0.0.0.0".into()), None, Some(10), true)
            .unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 3000);
        assert_eq!(config.turn_timeout(), Some(Duration::from_secs(10)));
        assert!(*config.trust_client_state());

        assert!(
            ServerConfig::default()
                .with_overrides(None, None, Some(0), false)
                .is_err()
        );
    }
}
