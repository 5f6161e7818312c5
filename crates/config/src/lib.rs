//! IoT SDK Configuration
//!
//! TOML-based configuration for the telemetry SDK. Only the application key
//! and the device type are required; everything else has a default.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use iot_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str(
//!     "[sdk]\napp_key = \"iot-AAB-AUM\"\n[device]\ndevice_type = \"SmartCar\"",
//! )
//! .unwrap();
//! assert_eq!(config.sdk.app_key, "iot-AAB-AUM");
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [sdk]
//! app_key = "iot-AAB-AUM"
//! collector_url = "https://iot-col.eum-appdynamics.com"
//! log_level = 3
//!
//! [device]
//! device_type = "SmartCar"
//! device_id = "1111"
//! ```

mod collector;
mod device;
mod error;
mod logging;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use collector::{
    APPLICATION_PATH, BEACONS_SUFFIX, CollectorEndpoints, DEFAULT_COLLECTOR_URL, ENABLED_SUFFIX,
    normalize_base_url,
};
pub use device::DeviceConfig;
pub use error::{ConfigError, Result};
pub use logging::LogLevel;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SDK settings
    pub sdk: SdkConfig,

    /// Device identity
    pub device: DeviceConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields of every section
    pub fn validate(&self) -> Result<()> {
        self.sdk.validate()?;
        self.device.validate()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// SDK settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SdkConfig {
    /// Application key issued by the controller (required)
    pub app_key: String,

    /// Collector base URL
    /// Default: [`DEFAULT_COLLECTOR_URL`]
    pub collector_url: Option<String>,

    /// Log level, 0 (off) to 6 (all)
    /// Default: 1 (error)
    pub log_level: LogLevel,
}

impl SdkConfig {
    /// Create SDK settings for an application key
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            ..Default::default()
        }
    }

    /// Set the collector base URL
    #[inline]
    #[must_use]
    pub fn with_collector_url(mut self, url: impl Into<String>) -> Self {
        self.collector_url = Some(url.into());
        self
    }

    /// Set the log level
    #[inline]
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Resolve collector URLs for this application
    pub fn endpoints(&self) -> CollectorEndpoints {
        CollectorEndpoints::new(self.collector_url.as_deref(), &self.app_key)
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.app_key.is_empty() {
            return Err(ConfigError::missing_field("sdk", "app_key"));
        }
        Ok(())
    }
}
