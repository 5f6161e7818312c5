//! SDK context
//!
//! [`Sdk`] owns the beacon store, the lifecycle state and the registered
//! transport. It is `Send + Sync`; all operations are synchronous and run
//! on the caller's thread.
//!
//! # Locking
//!
//! Store and state share one mutex. A send holds it from serialization
//! until the response has been applied, so each buffered event is posted at
//! most once and nothing added meanwhile is cleared unsent. State observers
//! run after the lock is released.

use std::sync::Arc;

use iot_config::{CollectorEndpoints, DeviceConfig, SdkConfig};
use iot_protocol::pretty_print;
use parking_lot::{Mutex, RwLock};
use tracing::{Level, debug, error, info, trace, warn};

use crate::beacon::{BeaconStore, EventCounts};
use crate::data::strip_delimiter;
use crate::error::{Result, SdkError};
use crate::event::{CustomEventBuilder, ErrorEventBuilder, NetworkRequestEventBuilder};
use crate::serialize::serialize_beacon;
use crate::state::{SdkState, StateMachine, StateObserver};
use crate::transport::{HttpRequest, Method, StatusClass, Transport};

/// Mutable SDK state guarded by one lock
struct Inner {
    state: StateMachine,
    beacon: BeaconStore,
}

/// Telemetry SDK instance
///
/// # Example
///
/// ```
/// use iot_config::{DeviceConfig, SdkConfig};
/// use iot_telemetry::{CustomEventBuilder, Sdk, SdkState};
///
/// let sdk = Sdk::init(
///     SdkConfig::new("iot-AAB-AUM"),
///     DeviceConfig::new("SmartCar").with_device_id("1111"),
/// )
/// .unwrap();
/// assert_eq!(sdk.state(), SdkState::Enabled);
///
/// sdk.add_custom_event(
///     CustomEventBuilder::new()
///         .event_type("Smart Car")
///         .summary("Events captured in smart car")
///         .timestamp_now()
///         .field("speed", 72.5),
/// )
/// .unwrap();
/// assert_eq!(sdk.event_counts().custom, 1);
/// ```
pub struct Sdk {
    endpoints: CollectorEndpoints,
    inner: Mutex<Inner>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    observer: Option<StateObserver>,
}

impl Sdk {
    /// Initialize with default options
    pub fn init(config: SdkConfig, device: DeviceConfig) -> Result<Self> {
        Self::builder(config, device).init()
    }

    /// Start configuring an SDK instance
    pub fn builder(config: SdkConfig, device: DeviceConfig) -> SdkBuilder {
        SdkBuilder {
            config,
            device,
            observer: None,
            transport: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SdkState {
        self.inner.lock().state.state()
    }

    /// Collector URLs in use
    #[inline]
    pub fn endpoints(&self) -> &CollectorEndpoints {
        &self.endpoints
    }

    /// Number of buffered events per kind
    pub fn event_counts(&self) -> EventCounts {
        self.inner.lock().beacon.counts()
    }

    /// Serialize the buffered events without sending them
    pub fn serialize(&self) -> String {
        serialize_beacon(&self.inner.lock().beacon)
    }

    /// Register (or replace) the HTTP transport
    pub fn register_transport(&self, transport: Arc<dyn Transport>) {
        *self.transport.write() = Some(transport);
        info!("network interface registered");
    }

    /// Buffer a custom event
    ///
    /// # Errors
    ///
    /// - `SdkNotEnabled` unless the SDK is enabled
    /// - `MaxLimitReached` if the custom event buffer is full
    pub fn add_custom_event(&self, event: CustomEventBuilder) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.state.ensure_enabled("add custom event")?;

        let event = event.build();
        info!(event_type = %event.event_type, "adding custom event");
        inner.beacon.add_custom_event(event)
    }

    /// Buffer a network request event
    ///
    /// # Errors
    ///
    /// - `SdkNotEnabled` unless the SDK is enabled
    /// - `InvalidInput` if the URL is missing
    /// - `NotSupported` if the URL points at the collector
    /// - `MaxLimitReached` if the network event buffer is full
    pub fn add_network_request_event(&self, event: NetworkRequestEventBuilder) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.state.ensure_enabled("add network request event")?;

        let event = event.build(self.endpoints.beacons())?;
        info!(url = %event.url, code = event.response_code, "adding network request event");
        inner.beacon.add_network_event(event)
    }

    /// Buffer an error event
    ///
    /// # Errors
    ///
    /// - `SdkNotEnabled` unless the SDK is enabled
    /// - `MaxLimitReached` if the error event buffer is full
    pub fn add_error_event(&self, event: ErrorEventBuilder) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.state.ensure_enabled("add error event")?;

        let event = event.build();
        info!(name = %event.name, severity = %event.severity, "adding error event");
        inner.beacon.add_error_event(event)
    }

    /// Post every buffered event to the collector
    ///
    /// An empty buffer succeeds without touching the transport. On 2xx the
    /// buffer is cleared. On 402/403/429 the buffer is cleared, the SDK is
    /// disabled and `NetworkReject` is returned. Any other outcome keeps the
    /// buffer for a later attempt.
    pub fn send_all_events(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.state.ensure_enabled("send all events")?;

        if inner.beacon.is_empty() {
            info!("no events to send");
            return Ok(());
        }

        let transport = self.registered_transport()?;

        let counts = inner.beacon.counts();
        info!(
            custom = counts.custom,
            network = counts.network,
            error = counts.error,
            "sending beacon"
        );

        let payload = serialize_beacon(&inner.beacon);
        if tracing::enabled!(Level::TRACE) {
            trace!("beacon payload: {}", pretty_print(&payload));
        }

        let request = HttpRequest::beacon(self.endpoints.beacons(), payload);
        let status = execute(transport.as_ref(), &request)?;

        let changed = match StatusClass::of(status) {
            StatusClass::Success => {
                inner.beacon.clear_all();
                info!(status, "beacon sent");
                return Ok(());
            }
            StatusClass::Rejected(_) => {
                inner.beacon.clear_all();
                inner.state.disable_for_status(status)
            }
            StatusClass::Failed => {
                error!(status, "beacon not accepted, keeping events");
                return Err(SdkError::NetworkError(format!(
                    "collector returned HTTP {status}"
                )));
            }
        };

        drop(inner);
        self.notify(changed);
        Err(SdkError::NetworkReject(status))
    }

    /// Drop every buffered event
    pub fn clear_all_events(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.state.ensure_enabled("clear all events")?;
        inner.beacon.clear_all();
        info!("cleared all events");
        Ok(())
    }

    /// Ask the collector whether this application may report
    ///
    /// Re-enables a disabled SDK on 2xx. Buffered events are never touched.
    pub fn check_app_status(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        let current = inner.state.state();
        if current == SdkState::Uninitialized {
            error!("cannot check app status before init");
            return Err(SdkError::SdkNotEnabled(current));
        }

        let transport = self.registered_transport()?;

        let request = HttpRequest::new(Method::Get, self.endpoints.enabled());
        let status = execute(transport.as_ref(), &request)?;

        let (changed, result) = match StatusClass::of(status) {
            StatusClass::Success => {
                info!(status, "app enabled by collector");
                (inner.state.transition(SdkState::Enabled), Ok(()))
            }
            StatusClass::Rejected(_) => (
                inner.state.disable_for_status(status),
                Err(SdkError::NetworkReject(status)),
            ),
            StatusClass::Failed => {
                error!(status, "unexpected app status response");
                (
                    None,
                    Err(SdkError::NetworkError(format!(
                        "collector returned HTTP {status}"
                    ))),
                )
            }
        };

        drop(inner);
        self.notify(changed);
        result
    }

    fn registered_transport(&self) -> Result<Arc<dyn Transport>> {
        self.transport.read().clone().ok_or_else(|| {
            error!("network interface not registered");
            SdkError::NetworkNotAvailable
        })
    }

    fn notify(&self, changed: Option<SdkState>) {
        if let Some(state) = changed
            && let Some(observer) = &self.observer
        {
            observer(state);
        }
    }
}

impl std::fmt::Debug for Sdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sdk")
            .field("endpoints", &self.endpoints)
            .field("state", &self.state())
            .field("has_transport", &self.transport.read().is_some())
            .finish()
    }
}

/// Options for [`Sdk::builder`]
pub struct SdkBuilder {
    config: SdkConfig,
    device: DeviceConfig,
    observer: Option<StateObserver>,
    transport: Option<Arc<dyn Transport>>,
}

impl SdkBuilder {
    /// Call `observer` with the new state after every state change
    #[must_use]
    pub fn on_state_change<F>(mut self, observer: F) -> Self
    where
        F: Fn(SdkState) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Register a transport up front
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate configuration and enable the SDK
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the app key or device type is missing.
    pub fn init(self) -> Result<Sdk> {
        let SdkBuilder {
            config,
            mut device,
            observer,
            transport,
        } = self;

        config.validate()?;

        device.device_type = strip_delimiter(&device.device_type);
        device.validate()?;
        if device.device_id.is_empty() {
            warn!("device id is not set");
        }

        if config.collector_url.as_deref().is_none_or(str::is_empty) {
            warn!("collector url not set, using default");
        }
        let endpoints = config.endpoints();
        info!(
            app_key = %config.app_key,
            collector = endpoints.base(),
            log_level = config.log_level.as_str(),
            "initializing sdk"
        );
        debug!(beacons = endpoints.beacons(), enabled = endpoints.enabled(), "collector endpoints");

        let mut state = StateMachine::new();
        let changed = state.transition(SdkState::Enabled);

        let sdk = Sdk {
            endpoints,
            inner: Mutex::new(Inner {
                state,
                beacon: BeaconStore::new(device),
            }),
            transport: RwLock::new(transport),
            observer,
        };
        sdk.notify(changed);
        Ok(sdk)
    }
}

/// Run one request and return its HTTP status
///
/// `done` is always called, whatever the outcome.
fn execute(transport: &dyn Transport, request: &HttpRequest) -> Result<u16> {
    debug!(method = %request.method, url = %request.url, "sending http request");
    let response = transport.send(request);

    let outcome = match &response {
        None => {
            error!(url = %request.url, "transport returned no response");
            Err(SdkError::NullPointer("transport returned no response".to_string()))
        }
        Some(resp) => match resp.error {
            Some(kind) => {
                error!(url = %request.url, error = %kind, "http request failed");
                Err(SdkError::from_kind(kind))
            }
            None => {
                info!(status = resp.status, "http response received");
                for header in &resp.headers {
                    debug!(key = %header.key, value = %header.value, "response header");
                }
                if !resp.body.is_empty() {
                    info!(
                        content = %String::from_utf8_lossy(&resp.body),
                        "response content"
                    );
                }
                Ok(resp.status)
            }
        },
    };

    transport.done(response);
    outcome
}
