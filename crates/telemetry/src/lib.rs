//! IoT telemetry - device-side beacon buffering and delivery.
//!
//! Applications record custom events, network request traces and error
//! reports. Events are buffered in a bounded beacon, serialized to JSON on
//! demand and posted to the collector through an application-supplied
//! transport. Collector responses drive the SDK state: a kill switch,
//! expired license or exceeded data limit disables it until a status check
//! succeeds.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Builders   │────▶│ BeaconStore  │────▶│  Serializer  │
//! │ (validation) │     │ (200 / kind) │     │ (JsonWriter) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        │                                         │
//!        │ gated by                                │ posted via
//!        ▼                                         ▼
//! ┌──────────────┐                         ┌──────────────┐
//! │ StateMachine │◀──── 402 / 403 / 429 ───│  Transport   │
//! └──────────────┘                         └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use iot_config::{DeviceConfig, SdkConfig};
//! use iot_telemetry::{
//!     CustomEventBuilder, HttpRequest, HttpResponse, Sdk, Transport,
//! };
//!
//! struct MyTransport;
//!
//! impl Transport for MyTransport {
//!     fn send(&self, _request: &HttpRequest) -> Option<HttpResponse> {
//!         Some(HttpResponse::new(202))
//!     }
//! }
//!
//! let sdk = Sdk::builder(SdkConfig::new("iot-AAB-AUM"), DeviceConfig::new("SmartCar"))
//!     .on_state_change(|state| println!("sdk state: {state}"))
//!     .transport(Arc::new(MyTransport))
//!     .init()?;
//!
//! sdk.add_custom_event(CustomEventBuilder::new().event_type("Boot").timestamp_now())?;
//! sdk.send_all_events()?;
//! # Ok::<(), iot_telemetry::SdkError>(())
//! ```

pub mod beacon;
pub mod data;
pub mod error;
pub mod event;
pub mod logging;
pub mod sdk;
pub mod serialize;
pub mod state;
pub mod test_utils;
pub mod transport;

pub use beacon::{BeaconStore, EventCounts, EventKind, MAX_EVENTS_PER_KIND};
pub use data::{DataField, DataValue, EventData};
pub use error::{ErrorKind, Result, SdkError};
pub use event::{
    CustomEventBuilder, ErrorEventBuilder, NetworkRequestEventBuilder, Severity, StackFrame,
    StackTrace,
};
pub use logging::{LogSink, SinkLayer, StderrSink};
pub use sdk::{Sdk, SdkBuilder};
pub use serialize::{AGENT_VERSION, serialize_beacon};
pub use state::SdkState;
pub use transport::{
    CORRELATION_HEADERS, Header, HttpRequest, HttpResponse, Method, Transport,
    correlation_headers,
};

// Test modules - only compiled during testing
#[cfg(test)]
mod data_test;
#[cfg(test)]
mod serialize_test;
