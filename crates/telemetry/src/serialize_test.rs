//! Tests for beacon serialization

use iot_config::DeviceConfig;

use crate::beacon::BeaconStore;
use crate::data::DataField;
use crate::event::{
    CustomEventBuilder, ErrorEventBuilder, NetworkRequestEventBuilder, Severity, StackFrame,
    StackTrace,
};
use crate::serialize::{AGENT_VERSION, serialize_beacon};

const BEACON_URL: &str = "http://collector/eumcollector/iot/v1/application/key/beacons";

fn store() -> BeaconStore {
    BeaconStore::new(DeviceConfig::new("Car").with_device_id("1"))
}

/// Payload with `events` spliced in after the device section
fn expected(events: &str) -> String {
    format!(
        r#"[{{"agentVersion":"{}","deviceInfo":{{"deviceId":"1","deviceType":"Car"}}{}}}]"#,
        AGENT_VERSION, events
    )
}

// =============================================================================
// Device section
// =============================================================================

#[test]
fn test_empty_store() {
    assert_eq!(serialize_beacon(&store()), expected(""));
}

#[test]
fn test_version_info() {
    let device = DeviceConfig::new("Car")
        .with_device_name("AudiS3")
        .with_hw_version("hw1")
        .with_os_version("os9");
    let json = serialize_beacon(&BeaconStore::new(device));

    assert_eq!(
        json,
        format!(
            r#"[{{"agentVersion":"{}","deviceInfo":{{"deviceName":"AudiS3","deviceType":"Car"}},"versionInfo":{{"hardwareVersion":"hw1","operatingSystemVersion":"os9"}}}}]"#,
            AGENT_VERSION
        )
    );
}

#[test]
fn test_no_device_sections_when_empty() {
    let json = serialize_beacon(&BeaconStore::new(DeviceConfig::default()));
    assert_eq!(json, format!(r#"[{{"agentVersion":"{}"}}]"#, AGENT_VERSION));
}

// =============================================================================
// Custom events
// =============================================================================

#[test]
fn test_custom_event() {
    let mut store = store();
    let event = CustomEventBuilder::new()
        .event_type("T")
        .summary("S")
        .timestamp(1000)
        .duration(5)
        .field("x", 1i64)
        .build();
    store.add_custom_event(event).unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(
            r#","customEvents":[{"eventType":"T","eventSummary":"S","timestamp":1000,"duration":5,"longProperties":{"x":1}}]"#
        )
    );
}

#[test]
fn test_custom_event_all_property_groups_in_order() {
    let mut store = store();
    let event = CustomEventBuilder::new()
        .event_type("T")
        .data_field(DataField::datetime("seen", 7))
        .field("flag", true)
        .field("ratio", 1.5)
        .field("count", 3i64)
        .field("name", "n")
        .build();
    store.add_custom_event(event).unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(
            r#","customEvents":[{"eventType":"T","stringProperties":{"name":"n"},"longProperties":{"count":3},"doubleProperties":{"ratio":1.500000},"booleanProperties":{"flag":true},"datetimeProperties":{"seen":7}}]"#
        )
    );
}

#[test]
fn test_zero_and_negative_timing_omitted() {
    let mut store = store();
    let event = CustomEventBuilder::new()
        .event_type("T")
        .timestamp(0)
        .duration(-5)
        .build();
    store.add_custom_event(event).unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(r#","customEvents":[{"eventType":"T"}]"#)
    );
}

#[test]
fn test_negative_timestamp_kept() {
    let mut store = store();
    let event = CustomEventBuilder::new().timestamp(-1).build();
    store.add_custom_event(event).unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(r#","customEvents":[{"timestamp":-1}]"#)
    );
}

// =============================================================================
// Network request events
// =============================================================================

#[test]
fn test_network_event() {
    let mut store = store();
    let event = NetworkRequestEventBuilder::new("https://a.com")
        .response_code(200)
        .request_content_length(10)
        .timestamp(5)
        .response_header("ADRUM_1", "v")
        .response_header("Server", "ignored")
        .field("k", "v")
        .build(BEACON_URL)
        .unwrap();
    store.add_network_event(event).unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(
            r#","networkRequestEvents":[{"url":"https:\/\/a.com","statusCode":200,"requestContentLength":10,"timestamp":5,"responseHeaders":{"ADRUM_1":["v"]},"stringProperties":{"k":"v"}}]"#
        )
    );
}

#[test]
fn test_network_event_error_without_status() {
    let mut store = store();
    let event = NetworkRequestEventBuilder::new("http://x")
        .error("timeout")
        .response_content_length(3)
        .duration(9)
        .build(BEACON_URL)
        .unwrap();
    store.add_network_event(event).unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(
            r#","networkRequestEvents":[{"url":"http:\/\/x","networkError":"timeout","responseContentLength":3,"duration":9}]"#
        )
    );
}

// =============================================================================
// Error events
// =============================================================================

#[test]
fn test_error_event_with_stack_trace() {
    let mut store = store();
    let trace = StackTrace::new("main").frame(StackFrame {
        symbol_name: "main".to_string(),
        symbol_offset: 4,
        file_name: "main.c".to_string(),
        line_number: 42,
        absolute_address: 100,
        image_offset: 8,
        ..Default::default()
    });
    let event = ErrorEventBuilder::new("E")
        .severity(Severity::Fatal)
        .stack_trace(trace)
        .build();
    store.add_error_event(event).unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(
            r#","errorEvents":[{"name":"E","severity":"fatal","errorStackTraceIndex":0,"stackTraces":[{"thread":"main","runtime":"native","stackFrames":[{"symbolName":"main","symbolOffset":4,"filePath":"main.c","lineNumber":42,"absoluteAddress":100,"imageOffset":8}]}]}]"#
        )
    );
}

#[test]
fn test_stack_frame_minimal_fields() {
    let mut store = store();
    let trace = StackTrace::new("worker").frame(StackFrame {
        package_name: "libfoo.so".to_string(),
        ..Default::default()
    });
    let event = ErrorEventBuilder::new("E")
        .message("boom")
        .severity(Severity::Alert)
        .stack_trace(trace)
        .stack_trace(StackTrace::new("idle"))
        .error_stack_trace_index(1)
        .build();
    store.add_error_event(event).unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(
            r#","errorEvents":[{"name":"E","message":"boom","severity":"alert","errorStackTraceIndex":1,"stackTraces":[{"thread":"worker","runtime":"native","stackFrames":[{"packageName":"libfoo.so","absoluteAddress":0,"imageOffset":0}]},{"thread":"idle","runtime":"native"}]}]"#
        )
    );
}

#[test]
fn test_error_event_without_traces() {
    let mut store = store();
    store
        .add_error_event(ErrorEventBuilder::new("E").build())
        .unwrap();

    assert_eq!(
        serialize_beacon(&store),
        expected(r#","errorEvents":[{"name":"E","severity":"critical"}]"#)
    );
}

// =============================================================================
// Whole payload
// =============================================================================

#[test]
fn test_all_kinds_parse_as_json() {
    let mut store = store();
    store
        .add_custom_event(CustomEventBuilder::new().event_type("a\"b").build())
        .unwrap();
    store
        .add_network_event(
            NetworkRequestEventBuilder::new("http://x/y")
                .response_code(404)
                .build(BEACON_URL)
                .unwrap(),
        )
        .unwrap();
    store
        .add_error_event(
            ErrorEventBuilder::new("E")
                .stack_trace(StackTrace::new("t"))
                .build(),
        )
        .unwrap();

    let json = serialize_beacon(&store);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let beacon = &parsed[0];

    assert_eq!(beacon["agentVersion"], AGENT_VERSION);
    assert_eq!(beacon["customEvents"][0]["eventType"], "a\"b");
    assert_eq!(beacon["networkRequestEvents"][0]["url"], "http://x/y");
    assert_eq!(beacon["networkRequestEvents"][0]["statusCode"], 404);
    assert_eq!(beacon["errorEvents"][0]["stackTraces"][0]["runtime"], "native");
}

#[test]
fn test_events_in_insertion_order() {
    let mut store = store();
    for n in 1..=3 {
        store
            .add_custom_event(CustomEventBuilder::new().timestamp(n).build())
            .unwrap();
    }

    assert_eq!(
        serialize_beacon(&store),
        expected(r#","customEvents":[{"timestamp":1},{"timestamp":2},{"timestamp":3}]"#)
    );
}
