//! Stored event types
//!
//! These are the normalized forms kept in the beacon store. Strings are
//! already stripped of the reserved delimiter, numeric ranges are clamped,
//! and properties live in [`EventData`].

use std::fmt;

use crate::data::EventData;

/// Runtime tag attached to every stack trace
pub const NATIVE_RUNTIME: &str = "native";

/// Error severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable, worth attention
    Alert,
    /// Serious failure (default)
    #[default]
    Critical,
    /// Unrecoverable failure
    Fatal,
}

impl Severity {
    /// Map a raw severity, clamping unknown values to `Critical`
    pub fn from_level(level: i64) -> Self {
        match level {
            0 => Self::Alert,
            2 => Self::Fatal,
            _ => Self::Critical,
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Critical => "critical",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One frame of a stack trace
///
/// Every field is optional on the wire; empty strings and zero offsets are
/// left out where the payload format allows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackFrame {
    pub symbol_name: String,
    pub package_name: String,
    pub file_name: String,
    pub line_number: i64,
    pub absolute_address: u64,
    pub image_offset: i64,
    pub symbol_offset: i64,
}

/// Stack trace of one thread
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    pub thread: String,
    pub frames: Vec<StackFrame>,
}

impl StackTrace {
    /// Create a trace for a named thread
    pub fn new(thread: impl Into<String>) -> Self {
        Self {
            thread: thread.into(),
            frames: Vec::new(),
        }
    }

    /// Append a frame
    #[inline]
    #[must_use]
    pub fn frame(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Runtime tag
    #[inline]
    pub fn runtime(&self) -> &'static str {
        NATIVE_RUNTIME
    }
}

/// Application-defined event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomEvent {
    pub event_type: String,
    pub summary: String,
    pub timestamp_ms: i64,
    pub duration_ms: i64,
    pub data: EventData,
}

/// Trace of an outgoing HTTP request made by the application
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkRequestEvent {
    pub url: String,
    /// Transport-level failure description
    pub error: String,
    pub request_content_length: i64,
    pub response_content_length: i64,
    /// HTTP status, or 0 when none was valid
    pub response_code: u16,
    pub timestamp_ms: i64,
    pub duration_ms: i64,
    /// Captured correlation headers
    pub response_headers: EventData,
    pub data: EventData,
}

/// Error or crash report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorEvent {
    pub name: String,
    pub message: String,
    pub severity: Severity,
    pub timestamp_ms: i64,
    pub duration_ms: i64,
    pub stack_traces: Vec<StackTrace>,
    /// Index of the trace that raised the error, always in bounds when
    /// traces exist
    pub error_stack_trace_index: usize,
    pub data: EventData,
}
