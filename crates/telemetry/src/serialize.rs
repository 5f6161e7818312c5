//! Beacon serialization
//!
//! Walks a [`BeaconStore`] and emits the collector payload. The layout is a
//! one-element array holding the beacon object:
//!
//! ```text
//! [{
//!   "agentVersion": ...,
//!   "deviceInfo": {...},          // iff any of id, name, type
//!   "versionInfo": {...},         // iff any version string
//!   "customEvents": [...],        // iff non-empty
//!   "networkRequestEvents": [...],
//!   "errorEvents": [...]
//! }]
//! ```
//!
//! Empty strings, zero timestamps and non-positive durations and lengths are
//! left out. Properties are grouped by type and emitted in key order.

use iot_protocol::JsonWriter;

use crate::beacon::BeaconStore;
use crate::data::EventData;
use crate::event::{CustomEvent, ErrorEvent, NetworkRequestEvent, StackFrame, StackTrace};

/// Version string reported in every beacon
pub const AGENT_VERSION: &str = concat!("IOT_RUST_SDK_", env!("CARGO_PKG_VERSION"));

/// Serialize the whole store into a collector payload
pub fn serialize_beacon(store: &BeaconStore) -> String {
    let mut json = JsonWriter::new();

    json.start_array(None).start_object(None);
    json.add_string_key_value("agentVersion", AGENT_VERSION);

    write_device(&mut json, store);

    if !store.custom_events().is_empty() {
        json.start_array(Some("customEvents"));
        for event in store.custom_events() {
            write_custom_event(&mut json, event);
        }
        json.end_array();
    }

    if !store.network_events().is_empty() {
        json.start_array(Some("networkRequestEvents"));
        for event in store.network_events() {
            write_network_event(&mut json, event);
        }
        json.end_array();
    }

    if !store.error_events().is_empty() {
        json.start_array(Some("errorEvents"));
        for event in store.error_events() {
            write_error_event(&mut json, event);
        }
        json.end_array();
    }

    json.end_object().end_array();
    json.into_string()
}

fn write_device(json: &mut JsonWriter, store: &BeaconStore) {
    let device = store.device();

    if device.has_identity() {
        json.start_object(Some("deviceInfo"));
        add_non_empty(json, "deviceId", &device.device_id);
        add_non_empty(json, "deviceName", &device.device_name);
        add_non_empty(json, "deviceType", &device.device_type);
        json.end_object();
    }

    if device.has_versions() {
        json.start_object(Some("versionInfo"));
        add_non_empty(json, "hardwareVersion", &device.hw_version);
        add_non_empty(json, "firmwareVersion", &device.fw_version);
        add_non_empty(json, "softwareVersion", &device.sw_version);
        add_non_empty(json, "operatingSystemVersion", &device.os_version);
        json.end_object();
    }
}

fn write_custom_event(json: &mut JsonWriter, event: &CustomEvent) {
    json.start_object(None);
    add_non_empty(json, "eventType", &event.event_type);
    add_non_empty(json, "eventSummary", &event.summary);
    add_timing(json, event.timestamp_ms, event.duration_ms);
    write_properties(json, &event.data);
    json.end_object();
}

fn write_network_event(json: &mut JsonWriter, event: &NetworkRequestEvent) {
    json.start_object(None);
    json.add_string_key_value("url", &event.url);
    if event.response_code != 0 {
        json.add_integer_key_value("statusCode", i64::from(event.response_code));
    }
    add_non_empty(json, "networkError", &event.error);
    add_positive(json, "requestContentLength", event.request_content_length);
    add_positive(json, "responseContentLength", event.response_content_length);
    add_timing(json, event.timestamp_ms, event.duration_ms);

    // Collector expects each header as a one-element array
    let headers = event.response_headers.strings();
    if !headers.is_empty() {
        json.start_object(Some("responseHeaders"));
        for (key, value) in headers {
            json.start_array(Some(key)).add_string_value(value).end_array();
        }
        json.end_object();
    }

    write_properties(json, &event.data);
    json.end_object();
}

fn write_error_event(json: &mut JsonWriter, event: &ErrorEvent) {
    json.start_object(None);
    add_non_empty(json, "name", &event.name);
    add_non_empty(json, "message", &event.message);
    json.add_string_key_value("severity", event.severity.as_str());
    add_timing(json, event.timestamp_ms, event.duration_ms);

    if !event.stack_traces.is_empty() {
        json.add_integer_key_value(
            "errorStackTraceIndex",
            event.error_stack_trace_index as i64,
        );
        json.start_array(Some("stackTraces"));
        for trace in &event.stack_traces {
            write_stack_trace(json, trace);
        }
        json.end_array();
    }

    write_properties(json, &event.data);
    json.end_object();
}

fn write_stack_trace(json: &mut JsonWriter, trace: &StackTrace) {
    json.start_object(None);
    json.add_string_key_value("thread", &trace.thread);
    json.add_string_key_value("runtime", trace.runtime());
    if !trace.frames.is_empty() {
        json.start_array(Some("stackFrames"));
        for frame in &trace.frames {
            write_stack_frame(json, frame);
        }
        json.end_array();
    }
    json.end_object();
}

fn write_stack_frame(json: &mut JsonWriter, frame: &StackFrame) {
    json.start_object(None);
    if !frame.symbol_name.is_empty() {
        json.add_string_key_value("symbolName", &frame.symbol_name);
        json.add_integer_key_value("symbolOffset", frame.symbol_offset);
    }
    add_non_empty(json, "packageName", &frame.package_name);
    add_non_empty(json, "filePath", &frame.file_name);
    add_positive(json, "lineNumber", frame.line_number);
    // Addresses above i64::MAX wrap, matching the collector's signed field
    json.add_integer_key_value("absoluteAddress", frame.absolute_address as i64);
    json.add_integer_key_value("imageOffset", frame.image_offset);
    json.end_object();
}

/// Typed property groups, each omitted when empty
fn write_properties(json: &mut JsonWriter, data: &EventData) {
    if !data.strings().is_empty() {
        json.start_object(Some("stringProperties"));
        for (key, value) in data.strings() {
            json.add_string_key_value(key, value);
        }
        json.end_object();
    }

    if !data.integers().is_empty() {
        json.start_object(Some("longProperties"));
        for (key, value) in data.integers() {
            json.add_integer_key_value(key, *value);
        }
        json.end_object();
    }

    if !data.doubles().is_empty() {
        json.start_object(Some("doubleProperties"));
        for (key, value) in data.doubles() {
            json.add_double_key_value(key, *value);
        }
        json.end_object();
    }

    if !data.booleans().is_empty() {
        json.start_object(Some("booleanProperties"));
        for (key, value) in data.booleans() {
            json.add_boolean_key_value(key, *value);
        }
        json.end_object();
    }

    if !data.datetimes().is_empty() {
        json.start_object(Some("datetimeProperties"));
        for (key, value) in data.datetimes() {
            json.add_integer_key_value(key, *value);
        }
        json.end_object();
    }
}

#[inline]
fn add_non_empty(json: &mut JsonWriter, key: &str, value: &str) {
    if !value.is_empty() {
        json.add_string_key_value(key, value);
    }
}

#[inline]
fn add_positive(json: &mut JsonWriter, key: &str, value: i64) {
    if value > 0 {
        json.add_integer_key_value(key, value);
    }
}

#[inline]
fn add_timing(json: &mut JsonWriter, timestamp_ms: i64, duration_ms: i64) {
    if timestamp_ms != 0 {
        json.add_integer_key_value("timestamp", timestamp_ms);
    }
    add_positive(json, "duration", duration_ms);
}
