//! Event builders
//!
//! Builders collect caller input as-is. Normalization happens when the SDK
//! turns a builder into a stored event: delimiters are stripped, numeric
//! ranges are clamped, and invalid properties are logged and dropped.

use tracing::{error, warn};

use crate::data::{DataField, DataValue, EventData, strip_delimiter};
use crate::error::{Result, SdkError};
use crate::event::now_millis;
use crate::event::types::{
    CustomEvent, ErrorEvent, NetworkRequestEvent, Severity, StackTrace,
};

/// Response header prefix kept for correlation, compared case-insensitively
const CORRELATION_HEADER_PREFIX: &str = "adrum";

/// Lowest valid HTTP status code
const MIN_STATUS_CODE: i32 = 100;

/// Highest valid HTTP status code
const MAX_STATUS_CODE: i32 = 599;

/// Builder for a custom event
///
/// # Example
///
/// ```
/// use iot_telemetry::event::CustomEventBuilder;
///
/// let event = CustomEventBuilder::new()
///     .event_type("Smart Car")
///     .summary("Events captured in smart car")
///     .timestamp(1_500_000_000_000)
///     .field("speed", 72.5)
///     .field("model", "S3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CustomEventBuilder {
    event_type: Option<String>,
    summary: Option<String>,
    timestamp_ms: i64,
    duration_ms: i64,
    data: Vec<DataField>,
}

impl CustomEventBuilder {
    /// Create a new custom event builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the event type
    #[inline]
    #[must_use]
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Set the event summary
    #[inline]
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the timestamp (milliseconds since Unix epoch)
    #[inline]
    #[must_use]
    pub fn timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Set the timestamp to now
    #[inline]
    #[must_use]
    pub fn timestamp_now(mut self) -> Self {
        self.timestamp_ms = now_millis();
        self
    }

    /// Set the duration in milliseconds
    #[inline]
    #[must_use]
    pub fn duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Add a property
    #[inline]
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.data.push(DataField::new(key, value));
        self
    }

    /// Add a prepared property
    #[inline]
    #[must_use]
    pub fn data_field(mut self, field: DataField) -> Self {
        self.data.push(field);
        self
    }

    /// Normalize into a stored event
    pub(crate) fn build(self) -> CustomEvent {
        let event_type = match self.event_type {
            Some(event_type) => strip_delimiter(&event_type),
            None => {
                warn!("custom event type is missing");
                String::new()
            }
        };
        let summary = self.summary.unwrap_or_else(|| {
            warn!("custom event summary is missing");
            String::new()
        });

        CustomEvent {
            event_type,
            summary,
            timestamp_ms: self.timestamp_ms,
            duration_ms: self.duration_ms,
            data: copy_fields(&self.data),
        }
    }
}

/// Builder for a network request event
///
/// The URL is required. Response headers are filtered down to correlation
/// headers when the event is stored.
#[derive(Debug, Clone, Default)]
pub struct NetworkRequestEventBuilder {
    url: Option<String>,
    error: Option<String>,
    response_code: i32,
    request_content_length: i64,
    response_content_length: i64,
    timestamp_ms: i64,
    duration_ms: i64,
    response_headers: Vec<DataField>,
    data: Vec<DataField>,
}

impl NetworkRequestEventBuilder {
    /// Create a builder for a request to `url`
    #[inline]
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create a builder without a URL
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the request URL
    #[inline]
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set a transport error description
    #[inline]
    #[must_use]
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Set the HTTP response status
    #[inline]
    #[must_use]
    pub fn response_code(mut self, code: i32) -> Self {
        self.response_code = code;
        self
    }

    /// Set the request body length in bytes
    #[inline]
    #[must_use]
    pub fn request_content_length(mut self, len: i64) -> Self {
        self.request_content_length = len;
        self
    }

    /// Set the response body length in bytes
    #[inline]
    #[must_use]
    pub fn response_content_length(mut self, len: i64) -> Self {
        self.response_content_length = len;
        self
    }

    /// Set the timestamp (milliseconds since Unix epoch)
    #[inline]
    #[must_use]
    pub fn timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Set the timestamp to now
    #[inline]
    #[must_use]
    pub fn timestamp_now(mut self) -> Self {
        self.timestamp_ms = now_millis();
        self
    }

    /// Set the duration in milliseconds
    #[inline]
    #[must_use]
    pub fn duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Add a response header
    #[inline]
    #[must_use]
    pub fn response_header(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.response_headers.push(DataField::new(key, value));
        self
    }

    /// Add several response headers
    #[must_use]
    pub fn response_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DataField>,
    {
        self.response_headers
            .extend(headers.into_iter().map(Into::into));
        self
    }

    /// Add a property
    #[inline]
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.data.push(DataField::new(key, value));
        self
    }

    /// Add a prepared property
    #[inline]
    #[must_use]
    pub fn data_field(mut self, field: DataField) -> Self {
        self.data.push(field);
        self
    }

    /// Normalize into a stored event
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the URL is missing or empty
    /// - `NotSupported` if the URL is a prefix of the collector beacon URL
    pub(crate) fn build(self, beacon_url: &str) -> Result<NetworkRequestEvent> {
        let url = match self.url {
            Some(url) if !url.is_empty() => url,
            _ => {
                error!("network request event url is missing");
                return Err(SdkError::invalid_input("network request url is required"));
            }
        };

        if beacon_url.starts_with(url.as_str()) {
            error!(url = %url, "network requests to the collector are not reported");
            return Err(SdkError::not_supported(format!(
                "network request to collector url {url}"
            )));
        }

        let response_code = if (MIN_STATUS_CODE..=MAX_STATUS_CODE).contains(&self.response_code) {
            self.response_code as u16
        } else {
            0
        };

        let error = self.error.unwrap_or_default();
        if error.is_empty() && response_code == 0 {
            warn!(
                url = %url,
                code = self.response_code,
                "network request has neither an error nor a valid response code"
            );
        }

        Ok(NetworkRequestEvent {
            url,
            error,
            request_content_length: self.request_content_length,
            response_content_length: self.response_content_length,
            response_code,
            timestamp_ms: self.timestamp_ms,
            duration_ms: self.duration_ms,
            response_headers: capture_correlation_headers(&self.response_headers),
            data: copy_fields(&self.data),
        })
    }
}

/// Builder for an error event
#[derive(Debug, Clone, Default)]
pub struct ErrorEventBuilder {
    name: Option<String>,
    message: Option<String>,
    severity: Severity,
    timestamp_ms: i64,
    duration_ms: i64,
    stack_traces: Vec<StackTrace>,
    error_stack_trace_index: usize,
    data: Vec<DataField>,
}

impl ErrorEventBuilder {
    /// Create a builder for an error called `name`
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the error message
    #[inline]
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the severity
    #[inline]
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the timestamp (milliseconds since Unix epoch)
    #[inline]
    #[must_use]
    pub fn timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Set the timestamp to now
    #[inline]
    #[must_use]
    pub fn timestamp_now(mut self) -> Self {
        self.timestamp_ms = now_millis();
        self
    }

    /// Set the duration in milliseconds
    #[inline]
    #[must_use]
    pub fn duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Append a stack trace
    #[inline]
    #[must_use]
    pub fn stack_trace(mut self, trace: StackTrace) -> Self {
        self.stack_traces.push(trace);
        self
    }

    /// Index of the trace that raised the error
    #[inline]
    #[must_use]
    pub fn error_stack_trace_index(mut self, index: usize) -> Self {
        self.error_stack_trace_index = index;
        self
    }

    /// Add a property
    #[inline]
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.data.push(DataField::new(key, value));
        self
    }

    /// Add a prepared property
    #[inline]
    #[must_use]
    pub fn data_field(mut self, field: DataField) -> Self {
        self.data.push(field);
        self
    }

    /// Normalize into a stored event
    pub(crate) fn build(self) -> ErrorEvent {
        let name = match self.name {
            Some(name) => strip_delimiter(&name),
            None => {
                warn!("error event name is missing");
                String::new()
            }
        };

        let mut error_stack_trace_index = self.error_stack_trace_index;
        if self.stack_traces.is_empty() {
            error_stack_trace_index = 0;
        } else if error_stack_trace_index >= self.stack_traces.len() {
            error!(
                index = error_stack_trace_index,
                count = self.stack_traces.len(),
                "invalid error stack trace index, using 0"
            );
            error_stack_trace_index = 0;
        }

        ErrorEvent {
            name,
            message: self.message.unwrap_or_default(),
            severity: self.severity,
            timestamp_ms: self.timestamp_ms,
            duration_ms: self.duration_ms,
            stack_traces: self.stack_traces,
            error_stack_trace_index,
            data: copy_fields(&self.data),
        }
    }
}

/// Copy caller properties, logging any that are dropped
fn copy_fields(fields: &[DataField]) -> EventData {
    let mut data = EventData::new();
    let stored = data.extend_from_fields(fields);
    if stored < fields.len() {
        warn!(
            dropped = fields.len() - stored,
            total = fields.len(),
            "some event properties were skipped"
        );
    }
    data
}

/// Keep string-valued headers whose key starts with the correlation prefix
fn capture_correlation_headers(headers: &[DataField]) -> EventData {
    let mut captured = EventData::new();
    for header in headers {
        if !is_correlation_header(&header.key) {
            continue;
        }
        match &header.value {
            DataValue::String(value) => {
                captured.set(&header.key, DataValue::String(value.trim_start().to_string()));
            }
            other => {
                error!(
                    key = %header.key,
                    value_type = other.type_name(),
                    "response header value must be a string"
                );
            }
        }
    }
    captured
}

fn is_correlation_header(key: &str) -> bool {
    key.get(..CORRELATION_HEADER_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CORRELATION_HEADER_PREFIX))
}
