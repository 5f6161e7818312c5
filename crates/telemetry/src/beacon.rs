//! Beacon store - bounded event buffer
//!
//! Holds the device identity and one ordered list per event kind. Each list
//! is capped; once full, further events of that kind are refused until the
//! store is cleared. The store is only ever cleared as a whole.

use std::fmt;

use iot_config::DeviceConfig;
use tracing::{error, info};

use crate::error::{Result, SdkError};
use crate::event::{CustomEvent, ErrorEvent, NetworkRequestEvent};

/// Maximum buffered events per kind
pub const MAX_EVENTS_PER_KIND: usize = 200;

/// Kind of event held in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Custom,
    Network,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Network => "network request",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of buffered events per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub custom: usize,
    pub network: usize,
    pub error: usize,
}

impl EventCounts {
    /// Total across kinds
    #[inline]
    pub fn total(&self) -> usize {
        self.custom + self.network + self.error
    }
}

/// Bounded in-memory beacon
#[derive(Debug, Clone)]
pub struct BeaconStore {
    device: DeviceConfig,
    custom_events: Vec<CustomEvent>,
    network_events: Vec<NetworkRequestEvent>,
    error_events: Vec<ErrorEvent>,
    max_per_kind: usize,
}

impl BeaconStore {
    /// Create an empty store for a device
    pub fn new(device: DeviceConfig) -> Self {
        Self::with_max_per_kind(device, MAX_EVENTS_PER_KIND)
    }

    /// Create an empty store with a custom per-kind cap
    pub fn with_max_per_kind(device: DeviceConfig, max_per_kind: usize) -> Self {
        Self {
            device,
            custom_events: Vec::new(),
            network_events: Vec::new(),
            error_events: Vec::new(),
            max_per_kind,
        }
    }

    #[inline]
    pub fn device(&self) -> &DeviceConfig {
        &self.device
    }

    pub fn add_custom_event(&mut self, event: CustomEvent) -> Result<()> {
        push_bounded(&mut self.custom_events, event, EventKind::Custom, self.max_per_kind)
    }

    pub fn add_network_event(&mut self, event: NetworkRequestEvent) -> Result<()> {
        push_bounded(&mut self.network_events, event, EventKind::Network, self.max_per_kind)
    }

    pub fn add_error_event(&mut self, event: ErrorEvent) -> Result<()> {
        push_bounded(&mut self.error_events, event, EventKind::Error, self.max_per_kind)
    }

    /// Drop every buffered event; the device identity is kept
    pub fn clear_all(&mut self) {
        self.custom_events.clear();
        self.network_events.clear();
        self.error_events.clear();
    }

    /// True iff no events of any kind are buffered
    pub fn is_empty(&self) -> bool {
        self.custom_events.is_empty() && self.network_events.is_empty() && self.error_events.is_empty()
    }

    pub fn counts(&self) -> EventCounts {
        EventCounts {
            custom: self.custom_events.len(),
            network: self.network_events.len(),
            error: self.error_events.len(),
        }
    }

    #[inline]
    pub fn custom_events(&self) -> &[CustomEvent] {
        &self.custom_events
    }

    #[inline]
    pub fn network_events(&self) -> &[NetworkRequestEvent] {
        &self.network_events
    }

    #[inline]
    pub fn error_events(&self) -> &[ErrorEvent] {
        &self.error_events
    }

    #[inline]
    pub fn max_per_kind(&self) -> usize {
        self.max_per_kind
    }
}

fn push_bounded<T>(list: &mut Vec<T>, event: T, kind: EventKind, max: usize) -> Result<()> {
    if list.len() >= max {
        error!(kind = %kind, max, "event buffer full, dropping event");
        return Err(SdkError::MaxLimitReached { kind, max });
    }
    list.push(event);
    info!(kind = %kind, count = list.len(), "event buffered");
    Ok(())
}
