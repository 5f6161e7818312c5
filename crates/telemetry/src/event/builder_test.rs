//! Tests for event builders and normalization

use crate::data::{DataField, DataValue};
use crate::error::ErrorKind;
use crate::event::{
    CustomEventBuilder, ErrorEventBuilder, NetworkRequestEventBuilder, Severity, StackFrame,
    StackTrace,
};

const BEACON_URL: &str =
    "http://testurl.appdynamics.com/eumcollector/iot/v1/application/iot-AAB-AUM/beacons";

// =============================================================================
// CustomEventBuilder
// =============================================================================

#[test]
fn test_custom_event_basic() {
    let event = CustomEventBuilder::new()
        .event_type("T")
        .summary("S")
        .timestamp(1000)
        .duration(5)
        .field("x", 1i64)
        .build();

    assert_eq!(event.event_type, "T");
    assert_eq!(event.summary, "S");
    assert_eq!(event.timestamp_ms, 1000);
    assert_eq!(event.duration_ms, 5);
    assert_eq!(event.data.get("x"), Some(DataValue::Integer(1)));
    assert_eq!(event.data.len(), 1);
}

#[test]
fn test_custom_event_strips_delimiter_from_type() {
    let event = CustomEventBuilder::new().event_type("Smart|Car|").build();
    assert_eq!(event.event_type, "SmartCar");
}

#[test]
fn test_custom_event_missing_type_and_summary() {
    let event = CustomEventBuilder::new().build();
    assert!(event.event_type.is_empty());
    assert!(event.summary.is_empty());
}

#[test]
fn test_custom_event_skips_empty_keys() {
    let event = CustomEventBuilder::new()
        .event_type("T")
        .field("", "dropped")
        .field("|", "dropped too")
        .field("kept", true)
        .build();

    assert_eq!(event.data.len(), 1);
    assert_eq!(event.data.get("kept"), Some(DataValue::Boolean(true)));
}

#[test]
fn test_custom_event_last_write_wins_across_types() {
    let event = CustomEventBuilder::new()
        .field("k", 1i64)
        .field("k", "s")
        .build();

    assert_eq!(event.data.get("k"), Some(DataValue::String("s".to_string())));
    assert!(event.data.integers().is_empty());
}

#[test]
fn test_custom_event_datetime_field() {
    let event = CustomEventBuilder::new()
        .data_field(DataField::datetime("seen", 1_500_000_000_000))
        .build();

    assert_eq!(event.data.datetimes().get("seen"), Some(&1_500_000_000_000));
}

#[test]
fn test_timestamp_now_is_recent() {
    let event = CustomEventBuilder::new().timestamp_now().build();
    assert!(event.timestamp_ms > 1_600_000_000_000);
}

// =============================================================================
// NetworkRequestEventBuilder
// =============================================================================

#[test]
fn test_network_event_basic() {
    let event = NetworkRequestEventBuilder::new("https://www.example.com")
        .response_code(200)
        .request_content_length(10)
        .response_content_length(20)
        .duration(150)
        .build(BEACON_URL)
        .unwrap();

    assert_eq!(event.url, "https://www.example.com");
    assert_eq!(event.response_code, 200);
    assert_eq!(event.request_content_length, 10);
    assert_eq!(event.response_content_length, 20);
    assert!(event.error.is_empty());
}

#[test]
fn test_network_event_missing_url() {
    let err = NetworkRequestEventBuilder::empty()
        .response_code(200)
        .build(BEACON_URL)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = NetworkRequestEventBuilder::new("")
        .build(BEACON_URL)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_network_event_collector_url_rejected() {
    let err = NetworkRequestEventBuilder::new("http://testurl.appdynamics.com")
        .response_code(200)
        .build(BEACON_URL)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotSupported);

    let err = NetworkRequestEventBuilder::new(BEACON_URL)
        .build(BEACON_URL)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotSupported);
}

#[test]
fn test_network_event_invalid_response_code_stored_as_zero() {
    for code in [-1, 0, 99, 600, 1000] {
        let event = NetworkRequestEventBuilder::new("https://www.example.com")
            .response_code(code)
            .build(BEACON_URL)
            .unwrap();
        assert_eq!(event.response_code, 0, "code {}", code);
    }

    for code in [100, 404, 599] {
        let event = NetworkRequestEventBuilder::new("https://www.example.com")
            .response_code(code)
            .build(BEACON_URL)
            .unwrap();
        assert_eq!(i32::from(event.response_code), code);
    }
}

#[test]
fn test_network_event_error_without_code() {
    let event = NetworkRequestEventBuilder::new("https://www.example.com")
        .error("connection refused")
        .build(BEACON_URL)
        .unwrap();

    assert_eq!(event.error, "connection refused");
    assert_eq!(event.response_code, 0);
}

#[test]
fn test_network_event_captures_correlation_headers_only() {
    let event = NetworkRequestEventBuilder::new("https://www.example.com")
        .response_code(200)
        .response_header("ADRUM_0", "  clientRequestGUID:abc")
        .response_header("adrum_1", "isEumEnabled:true")
        .response_header("AdRuM_2", "mixed")
        .response_header("Content-Type", "application/json")
        .response_header("ADRUM_3", 5i64)
        .response_header("ADR", "too short")
        .build(BEACON_URL)
        .unwrap();

    let headers = event.response_headers.strings();
    assert_eq!(headers.len(), 3);
    assert_eq!(
        headers.get("ADRUM_0").map(String::as_str),
        Some("clientRequestGUID:abc")
    );
    assert_eq!(
        headers.get("adrum_1").map(String::as_str),
        Some("isEumEnabled:true")
    );
    assert_eq!(headers.get("AdRuM_2").map(String::as_str), Some("mixed"));
    assert!(event.response_headers.get("ADRUM_3").is_none());
}

#[test]
fn test_network_event_response_headers_from_fields() {
    let event = NetworkRequestEventBuilder::new("https://www.example.com")
        .response_code(200)
        .response_headers(vec![
            DataField::new("ADRUM_1", "a"),
            DataField::new("Server", "nginx"),
        ])
        .build(BEACON_URL)
        .unwrap();

    assert_eq!(event.response_headers.len(), 1);
}

// =============================================================================
// ErrorEventBuilder
// =============================================================================

fn sample_trace(thread: &str) -> StackTrace {
    StackTrace::new(thread).frame(StackFrame {
        symbol_name: "main".to_string(),
        file_name: "main.c".to_string(),
        line_number: 42,
        absolute_address: 0x7f8b_d984_876c,
        ..Default::default()
    })
}

#[test]
fn test_error_event_basic() {
    let event = ErrorEventBuilder::new("Bluetooth|Error")
        .message("device disconnected")
        .severity(Severity::Alert)
        .stack_trace(sample_trace("main"))
        .build();

    assert_eq!(event.name, "BluetoothError");
    assert_eq!(event.message, "device disconnected");
    assert_eq!(event.severity, Severity::Alert);
    assert_eq!(event.stack_traces.len(), 1);
    assert_eq!(event.stack_traces[0].runtime(), "native");
    assert_eq!(event.stack_traces[0].frames[0].line_number, 42);
}

#[test]
fn test_error_event_default_severity_is_critical() {
    let event = ErrorEventBuilder::new("E").build();
    assert_eq!(event.severity, Severity::Critical);
}

#[test]
fn test_error_event_index_clamped() {
    let event = ErrorEventBuilder::new("E")
        .stack_trace(sample_trace("t1"))
        .stack_trace(sample_trace("t2"))
        .error_stack_trace_index(2)
        .build();
    assert_eq!(event.error_stack_trace_index, 0);

    let event = ErrorEventBuilder::new("E")
        .stack_trace(sample_trace("t1"))
        .stack_trace(sample_trace("t2"))
        .error_stack_trace_index(1)
        .build();
    assert_eq!(event.error_stack_trace_index, 1);
}

#[test]
fn test_error_event_index_without_traces() {
    let event = ErrorEventBuilder::new("E").error_stack_trace_index(3).build();
    assert_eq!(event.error_stack_trace_index, 0);
    assert!(event.stack_traces.is_empty());
}

#[test]
fn test_severity_from_level() {
    assert_eq!(Severity::from_level(0), Severity::Alert);
    assert_eq!(Severity::from_level(1), Severity::Critical);
    assert_eq!(Severity::from_level(2), Severity::Fatal);
    assert_eq!(Severity::from_level(3), Severity::Critical);
    assert_eq!(Severity::from_level(-1), Severity::Critical);
    assert_eq!(Severity::Fatal.as_str(), "fatal");
}
