//! SDK error types.
//!
//! Every fallible SDK operation returns [`SdkError`]. Transports report
//! failures with the lighter [`ErrorKind`], which the SDK lifts into an
//! `SdkError` when propagating.

use std::fmt;

use iot_config::ConfigError;
use thiserror::Error;

use crate::beacon::EventKind;
use crate::state::SdkState;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Stable error classification shared with transports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    MaxLimitReached,
    NetworkError,
    NetworkReject,
    NetworkUnreachable,
    NetworkNotAvailable,
    NullPointer,
    Internal,
    NotSupported,
    SdkNotEnabled,
}

impl ErrorKind {
    /// Stable upper-case code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::MaxLimitReached => "MAX_LIMIT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::NetworkReject => "NETWORK_REJECT",
            Self::NetworkUnreachable => "NETWORK_UNREACHABLE",
            Self::NetworkNotAvailable => "NETWORK_NOT_AVAILABLE",
            Self::NullPointer => "NULL_PTR",
            Self::Internal => "INTERNAL_ERROR",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::SdkNotEnabled => "SDK_NOT_ENABLED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by SDK operations
#[derive(Debug, Error)]
pub enum SdkError {
    /// Caller supplied a missing or malformed argument
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Beacon store already holds the maximum number of events of this kind
    #[error("max limit reached: {kind} events capped at {max}")]
    MaxLimitReached {
        /// Event list that is full
        kind: EventKind,
        /// Capacity of that list
        max: usize,
    },

    /// Collector returned an unexpected status, or the transport failed
    #[error("network error: {0}")]
    NetworkError(String),

    /// Collector permanently rejected the request
    #[error("network reject: HTTP {0}")]
    NetworkReject(u16),

    /// Collector could not be reached
    #[error("network unreachable")]
    NetworkUnreachable,

    /// No transport registered or network down
    #[error("network not available")]
    NetworkNotAvailable,

    /// Transport returned no response
    #[error("null pointer: {0}")]
    NullPointer(String),

    /// Operation is not allowed for this input
    #[error("not supported: {0}")]
    NotSupported(String),

    /// SDK is not in the enabled state
    #[error("sdk not enabled: current state {0}")]
    SdkNotEnabled(SdkState),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl SdkError {
    /// Create an invalid input error
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a not supported error
    #[inline]
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported(message.into())
    }

    /// Lift a transport-reported kind into an error
    pub fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidInput => Self::invalid_input("rejected by transport"),
            ErrorKind::MaxLimitReached => Self::MaxLimitReached {
                kind: EventKind::Custom,
                max: 0,
            },
            ErrorKind::NetworkError => Self::NetworkError("transport failure".to_string()),
            ErrorKind::NetworkReject => Self::NetworkReject(0),
            ErrorKind::NetworkUnreachable => Self::NetworkUnreachable,
            ErrorKind::NetworkNotAvailable => Self::NetworkNotAvailable,
            ErrorKind::NullPointer => Self::NullPointer("transport failure".to_string()),
            ErrorKind::Internal => Self::Internal("transport failure".to_string()),
            ErrorKind::NotSupported => Self::not_supported("rejected by transport"),
            ErrorKind::SdkNotEnabled => Self::SdkNotEnabled(SdkState::Uninitialized),
        }
    }

    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::MaxLimitReached { .. } => ErrorKind::MaxLimitReached,
            Self::NetworkError(_) => ErrorKind::NetworkError,
            Self::NetworkReject(_) => ErrorKind::NetworkReject,
            Self::NetworkUnreachable => ErrorKind::NetworkUnreachable,
            Self::NetworkNotAvailable => ErrorKind::NetworkNotAvailable,
            Self::NullPointer(_) => ErrorKind::NullPointer,
            Self::NotSupported(_) => ErrorKind::NotSupported,
            Self::SdkNotEnabled(_) => ErrorKind::SdkNotEnabled,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether retrying the same operation later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_) | Self::NetworkUnreachable | Self::NetworkNotAvailable
        )
    }
}

impl From<ConfigError> for SdkError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
