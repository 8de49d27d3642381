//! Configuration management for the bridge

use crate::device::{Capabilities, DeviceDescriptor};
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{env, time::Duration};
use url::Url;

/// Default Tuya Web endpoint (EU region)
pub const DEFAULT_BASE_URL: &str = "https://px1.tuyaeu.com";

/// Bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    /// Tuya Web API configuration
    #[serde(default)]
    pub tuya: TuyaConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Devices to expose
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

/// Tuya Web API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuyaConfig {
    /// API base URL (e.g., "https://px1.tuyaus.com")
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Session access token; obtaining it is out of scope for this crate
    #[serde(default)]
    pub access_token: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for TuyaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: String::new(),
            timeout: default_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "tuya_hap_bridge=debug")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file (rotated daily)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// One configured device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Tuya device id
    pub id: String,

    /// Display name
    pub name: String,

    /// Tuya device type
    #[serde(default)]
    pub dev_type: Option<String>,

    /// Capability data as reported by device discovery
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl DeviceConfig {
    pub fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor {
            device_id: self.id.clone(),
            name: self.name.clone(),
            dev_type: self.dev_type.clone(),
            capabilities: self.capabilities.clone(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| BridgeError::config(format!("Invalid config file {}: {e}", path.display())))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("TUYA_BASE_URL") {
            self.tuya.base_url = url
                .parse()
                .map_err(|e| BridgeError::config(format!("Invalid TUYA_BASE_URL: {e}")))?;
        }

        if let Ok(token) = env::var("TUYA_ACCESS_TOKEN") {
            self.tuya.access_token = token;
        }

        if let Ok(timeout) = env::var("TUYA_TIMEOUT") {
            self.tuya.timeout = Duration::from_secs(
                timeout
                    .parse()
                    .map_err(|e| BridgeError::config(format!("Invalid TUYA_TIMEOUT: {e}")))?,
            );
        }

        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tuya.base_url.scheme() != "http" && self.tuya.base_url.scheme() != "https" {
            return Err(BridgeError::config("Base URL must use http or https scheme"));
        }

        if self.tuya.access_token.is_empty() {
            return Err(BridgeError::config("Access token cannot be empty"));
        }

        if self.tuya.timeout.is_zero() {
            return Err(BridgeError::config("Timeout must be greater than zero"));
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.id.is_empty() {
                return Err(BridgeError::config(format!(
                    "Device '{}' has an empty id",
                    device.name
                )));
            }
            if !seen.insert(device.id.as_str()) {
                return Err(BridgeError::config(format!(
                    "Duplicate device id: {}",
                    device.id
                )));
            }
        }

        Ok(())
    }

    pub fn device(&self, id: &str) -> Option<&DeviceConfig> {
        self.devices.iter().find(|device| device.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> BridgeConfig {
        let mut config = BridgeConfig::default();
        config.tuya.access_token = "EUheu1234".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.tuya.base_url.as_str(), "https://px1.tuyaeu.com/");
        assert_eq!(config.tuya.timeout, Duration::from_secs(10));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validation() {
        assert!(valid().validate().is_ok());
        assert!(BridgeConfig::default().validate().is_err());

        let mut config = valid();
        config.tuya.timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.tuya.base_url = Url::parse("ftp://example.com").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_device_ids_rejected() {
        let mut config = valid();
        let device = DeviceConfig {
            id: "bf01".to_string(),
            name: "Fan".to_string(),
            dev_type: None,
            capabilities: Capabilities::new(),
        };
        config.devices = vec![device.clone(), device];

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate device id"));
    }
}
