//! Device identity configuration
//!
//! Identifies the device that produces beacons. Only the device type is
//! required; empty strings are treated as unset and left out of payloads.
//!
//! # Example
//!
//! ```toml
//! [device]
//! device_type = "SmartCar"
//! device_id = "1111"
//! device_name = "AudiS3"
//! fw_version = "1.0"
//! ```

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Device identity and version strings
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceConfig {
    /// Unique device id
    pub device_id: String,

    /// Human readable device name
    pub device_name: String,

    /// Device type (required)
    pub device_type: String,

    /// Hardware version
    pub hw_version: String,

    /// Firmware version
    pub fw_version: String,

    /// Software version
    pub sw_version: String,

    /// Operating system version
    pub os_version: String,
}

impl DeviceConfig {
    /// Create a device config with the required device type
    pub fn new(device_type: impl Into<String>) -> Self {
        Self {
            device_type: device_type.into(),
            ..Default::default()
        }
    }

    /// Set the device id
    #[inline]
    #[must_use]
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    /// Set the device name
    #[inline]
    #[must_use]
    pub fn with_device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = device_name.into();
        self
    }

    /// Set the hardware version
    #[inline]
    #[must_use]
    pub fn with_hw_version(mut self, version: impl Into<String>) -> Self {
        self.hw_version = version.into();
        self
    }

    /// Set the firmware version
    #[inline]
    #[must_use]
    pub fn with_fw_version(mut self, version: impl Into<String>) -> Self {
        self.fw_version = version.into();
        self
    }

    /// Set the software version
    #[inline]
    #[must_use]
    pub fn with_sw_version(mut self, version: impl Into<String>) -> Self {
        self.sw_version = version.into();
        self
    }

    /// Set the operating system version
    #[inline]
    #[must_use]
    pub fn with_os_version(mut self, version: impl Into<String>) -> Self {
        self.os_version = version.into();
        self
    }

    /// Whether any of id, name or type is set
    pub fn has_identity(&self) -> bool {
        !self.device_id.is_empty() || !self.device_name.is_empty() || !self.device_type.is_empty()
    }

    /// Whether any version string is set
    pub fn has_versions(&self) -> bool {
        !self.hw_version.is_empty()
            || !self.fw_version.is_empty()
            || !self.sw_version.is_empty()
            || !self.os_version.is_empty()
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.device_type.is_empty() {
            return Err(ConfigError::missing_field("device", "device_type"));
        }
        Ok(())
    }
}
