//! SDK lifecycle state
//!
//! ```text
//! Uninitialized --init--> Enabled
//! any --402--> DisabledLicenseExpired
//! any --403--> DisabledKillSwitch
//! any --429--> DisabledDataLimitExceeded
//! Disabled* --status check 2xx--> Enabled
//! ```
//!
//! Only `Enabled` accepts, sends or clears events. Transitions into the
//! current state are logged and otherwise ignored.

use std::fmt;

use tracing::{error, info, warn};

use crate::error::{Result, SdkError};

/// Payment required: license expired
pub const STATUS_LICENSE_EXPIRED: u16 = 402;

/// Forbidden: application disabled by kill switch
pub const STATUS_KILL_SWITCH: u16 = 403;

/// Too many requests: data limit exceeded
pub const STATUS_DATA_LIMIT_EXCEEDED: u16 = 429;

/// Callback invoked with the new state after each real transition
pub type StateObserver = Box<dyn Fn(SdkState) + Send + Sync>;

/// SDK lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SdkState {
    #[default]
    Uninitialized,
    Enabled,
    DisabledKillSwitch,
    DisabledLicenseExpired,
    DisabledDataLimitExceeded,
}

impl SdkState {
    /// Stable upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "SDK_UNINITIALIZED",
            Self::Enabled => "SDK_ENABLED",
            Self::DisabledKillSwitch => "SDK_DISABLED_KILL_SWITCH",
            Self::DisabledLicenseExpired => "SDK_DISABLED_LICENSE_EXPIRED",
            Self::DisabledDataLimitExceeded => "SDK_DISABLED_DATA_LIMIT_EXCEEDED",
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Whether the collector has turned the SDK off
    #[inline]
    pub fn is_disabled(&self) -> bool {
        matches!(
            self,
            Self::DisabledKillSwitch | Self::DisabledLicenseExpired | Self::DisabledDataLimitExceeded
        )
    }

    /// Disabled state a collector status code maps to, if any
    pub fn disabled_for_status(status: u16) -> Option<Self> {
        match status {
            STATUS_LICENSE_EXPIRED => Some(Self::DisabledLicenseExpired),
            STATUS_KILL_SWITCH => Some(Self::DisabledKillSwitch),
            STATUS_DATA_LIMIT_EXCEEDED => Some(Self::DisabledDataLimitExceeded),
            _ => None,
        }
    }
}

impl fmt::Display for SdkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holder of the current state
#[derive(Debug, Default)]
pub struct StateMachine {
    state: SdkState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> SdkState {
        self.state
    }

    /// Move to `next`
    ///
    /// Returns the new state if it differs from the current one, so the
    /// caller can notify observers once any locks are released.
    pub fn transition(&mut self, next: SdkState) -> Option<SdkState> {
        if self.state == next {
            warn!(state = %next, "sdk already in requested state");
            return None;
        }
        info!(from = %self.state, to = %next, "sdk state changed");
        self.state = next;
        Some(next)
    }

    /// Apply a rejection status from the collector
    ///
    /// Returns `None` for codes that do not disable the SDK.
    pub fn disable_for_status(&mut self, status: u16) -> Option<SdkState> {
        let Some(next) = SdkState::disabled_for_status(status) else {
            info!(status, "status code does not disable the sdk");
            return None;
        };
        match next {
            SdkState::DisabledLicenseExpired => error!(status, "license expired, disabling sdk"),
            SdkState::DisabledKillSwitch => error!(status, "kill switch engaged, disabling sdk"),
            _ => error!(status, "data limit exceeded, disabling sdk"),
        }
        self.transition(next)
    }

    /// Fail with `SdkNotEnabled` unless enabled
    pub fn ensure_enabled(&self, operation: &'static str) -> Result<()> {
        if self.state.is_enabled() {
            return Ok(());
        }
        error!(operation, state = %self.state, "sdk not in enabled state");
        Err(SdkError::SdkNotEnabled(self.state))
    }
}
