//! Event module - custom, network request and error events
//!
//! Callers describe events with the builders; the SDK normalizes them into
//! the stored types held by the beacon store.

mod builder;
mod types;

#[cfg(test)]
mod builder_test;

pub use builder::{CustomEventBuilder, ErrorEventBuilder, NetworkRequestEventBuilder};
pub use types::{
    CustomEvent, ErrorEvent, NATIVE_RUNTIME, NetworkRequestEvent, Severity, StackFrame,
    StackTrace,
};

/// Current time in milliseconds since the Unix epoch
#[inline]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
