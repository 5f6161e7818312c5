//! Sample custom, network request and error events
//!
//! Each helper adds one event, prints the add status and, if the add
//! succeeded, flushes the beacon and prints the send status.

use std::time::Instant;

use iot_telemetry::event::now_millis;
use iot_telemetry::transport::JSON_CONTENT_TYPE;
use iot_telemetry::{
    CustomEventBuilder, DataField, ErrorEventBuilder, ErrorKind, HttpRequest, Method,
    NetworkRequestEventBuilder, Result, Sdk, Severity, StackFrame, StackTrace, Transport,
    correlation_headers,
};

/// Printable outcome of an SDK call
pub fn status(result: &Result<()>) -> &'static str {
    match result {
        Ok(()) => "SUCCESS",
        Err(e) => e.kind().as_str(),
    }
}

fn add_and_send(sdk: &Sdk, label: &str, added: Result<()>) -> Result<()> {
    println!("Add {} Event Status :{}", label, status(&added));
    added?;

    let sent = sdk.send_all_events();
    println!("Send {} Event Status :{}\n", label, status(&sent));
    sent
}

pub fn send_custom_event(sdk: &Sdk) -> Result<()> {
    let now = now_millis();
    let event = CustomEventBuilder::new()
        .event_type("Smart Car")
        .summary("Events Captured in Smart Car")
        .timestamp(now)
        .duration(10)
        .field("VinNumber", "VN123456")
        .field("MPG Reading", 23i64)
        .field("Annual Mileage", 12_000i64)
        .field("Temperature", 101.3)
        .field("Engine Lights ON", false)
        .data_field(DataField::datetime("Last Engine Start Time", now));

    add_and_send(sdk, "Custom", sdk.add_custom_event(event))
}

/// Canned network event for a weather API call
pub fn send_network_event(sdk: &Sdk) -> Result<()> {
    let event = NetworkRequestEventBuilder::new("https://apdy.api.com/weather")
        .response_code(202)
        .duration(10)
        .request_content_length(300)
        .response_content_length(100)
        .timestamp_now()
        .field("city", "San Francisco")
        .field("country", "USA")
        .field("zip", 94_107i64)
        .field("latitude", 37.30)
        .field("longitude", -122.39);

    add_and_send(sdk, "Network", sdk.add_network_request_event(event))
}

/// Perform a live request and report it as a network event
///
/// The request carries the collector correlation headers so the response
/// headers can be linked to a server-side trace.
pub fn capture_and_send_network_event(
    sdk: &Sdk,
    transport: &dyn Transport,
    url: &str,
    method: Method,
    data: Option<&str>,
) -> Result<()> {
    let event = capture_network_event(transport, url, method, data);
    add_and_send(sdk, "Network", sdk.add_network_request_event(event))
}

fn capture_network_event(
    transport: &dyn Transport,
    url: &str,
    method: Method,
    data: Option<&str>,
) -> NetworkRequestEventBuilder {
    let mut request = HttpRequest::new(method, url)
        .header("Accept", JSON_CONTENT_TYPE)
        .header("Content-Type", JSON_CONTENT_TYPE);
    request.headers.extend(correlation_headers());
    if let Some(data) = data {
        request = request.body(data);
    }

    println!("Triggering Network Request to url:{}", url);

    let timestamp = now_millis();
    let started = Instant::now();
    let response = transport.send(&request);
    let elapsed = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

    let request_len = data.map_or(0, str::len);
    let mut event = NetworkRequestEventBuilder::new(url)
        .timestamp(timestamp)
        .duration(elapsed)
        .request_content_length(request_len as i64);

    event = match &response {
        Some(response) => match response.error {
            Some(kind) => event.error(kind.as_str()),
            None => {
                println!("Http Response Code:{}", response.status);
                event
                    .response_code(i32::from(response.status))
                    .response_content_length(response.content_length() as i64)
                    .response_headers(response.headers.iter().cloned())
            }
        },
        None => event.error(ErrorKind::NullPointer.as_str()),
    };

    transport.done(response);
    event
}

pub fn send_error_event_alert(sdk: &Sdk) -> Result<()> {
    let event = ErrorEventBuilder::new("Warning Light")
        .message("Oil Change Reminder")
        .severity(Severity::Alert)
        .timestamp_now()
        .duration(0)
        .field("Mileage", 27_300i64);

    add_and_send(sdk, "Alert Error", sdk.add_error_event(event))
}

pub fn send_error_event_critical(sdk: &Sdk) -> Result<()> {
    let event = ErrorEventBuilder::new("Bluetooth Connection Error")
        .message("connection dropped during voice call due to bluetooth exception")
        .severity(Severity::Critical)
        .timestamp_now()
        .duration(0)
        .field("UUID", "00001101-0000-1000-8000-00805f9b34fb")
        .field("Bluetooth Version", "3.0")
        .field("Error Code", 43i64);

    add_and_send(sdk, "Critical Error", sdk.add_error_event(event))
}

pub fn send_error_event_fatal(sdk: &Sdk) -> Result<()> {
    let event = ErrorEventBuilder::new("I/O Exception")
        .message("error while writing data to file")
        .severity(Severity::Fatal)
        .timestamp_now()
        .duration(0)
        .stack_trace(media_player_trace())
        .error_stack_trace_index(0);

    add_and_send(sdk, "Fatal Error", sdk.add_error_event(event))
}

fn media_player_trace() -> StackTrace {
    const PACKAGE: &str = "/home/native-app/mediaplayer/build/mediaplayer_main.so";

    StackTrace::new("main")
        .frame(StackFrame {
            symbol_name: "_libc_start_main".to_string(),
            package_name: "/system/lib/libc.so".to_string(),
            absolute_address: 0x7f8b_d984_876c,
            ..Default::default()
        })
        .frame(StackFrame {
            symbol_name: "main".to_string(),
            package_name: PACKAGE.to_string(),
            file_name: "main.c".to_string(),
            line_number: 71,
            absolute_address: 0x7f8b_d984_876c,
            image_offset: 18_861,
            symbol_offset: 10,
        })
        .frame(StackFrame {
            symbol_name: "write_data".to_string(),
            package_name: PACKAGE.to_string(),
            file_name: "writedata.c".to_string(),
            line_number: 271,
            absolute_address: 0x7f8b_da3f_915b,
            image_offset: 116_437,
            symbol_offset: 12,
        })
        .frame(StackFrame {
            symbol_name: "write_to_file".to_string(),
            package_name: PACKAGE.to_string(),
            file_name: "writedata.c".to_string(),
            line_number: 524,
            absolute_address: 0x7f8b_da9f_69d1,
            image_offset: 287_531,
            symbol_offset: 34,
        })
}
