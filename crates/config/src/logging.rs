//! Logging configuration
//!
//! The SDK log level is a number from 0 (off) to 6 (everything). Config
//! files may use either the number or the level name. Anything outside the
//! known range falls back to error-only logging.

use serde::Deserialize;

/// SDK log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(from = "RawLogLevel")]
pub enum LogLevel {
    /// No logging
    Off = 0,
    /// Errors only (default)
    #[default]
    Error = 1,
    /// Warnings and errors
    Warn = 2,
    /// Informational messages
    Info = 3,
    /// Debugging information
    Debug = 4,
    /// Verbose output including payload dumps
    Verbose = 5,
    /// Everything
    All = 6,
}

impl LogLevel {
    /// Map a numeric level (0-6), falling back to `Error` when out of range
    pub fn from_level(level: i64) -> Self {
        match level {
            0 => Self::Off,
            1 => Self::Error,
            2 => Self::Warn,
            3 => Self::Info,
            4 => Self::Debug,
            5 => Self::Verbose,
            6 => Self::All,
            _ => Self::Error,
        }
    }

    /// Parse a level name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        let level = match name.to_ascii_lowercase().as_str() {
            "off" => Self::Off,
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "info" => Self::Info,
            "debug" => Self::Debug,
            "verbose" | "trace" => Self::Verbose,
            "all" => Self::All,
            _ => return None,
        };
        Some(level)
    }

    /// Numeric level
    #[inline]
    pub fn as_level(&self) -> u8 {
        *self as u8
    }

    /// Level name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Verbose => "verbose",
            Self::All => "all",
        }
    }
}

/// Level as written in a config file
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLogLevel {
    Number(i64),
    Name(String),
}

impl From<RawLogLevel> for LogLevel {
    fn from(raw: RawLogLevel) -> Self {
        match raw {
            RawLogLevel::Number(level) => Self::from_level(level),
            RawLogLevel::Name(name) => Self::from_name(&name).unwrap_or_default(),
        }
    }
}
