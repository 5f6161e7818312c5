//! Log sink integration
//!
//! The SDK logs through `tracing`. Applications that want the SDK's
//! diagnostics install [`SinkLayer`] (usually via [`init`]), which renders
//! each event as a single line and hands it to their [`LogSink`]:
//!
//! ```text
//! E/IOTSDK: event buffer full, dropping event kind=custom max=200
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use iot_config::LogLevel;
//! use iot_telemetry::logging::{self, MemorySink};
//!
//! let sink = Arc::new(MemorySink::default());
//! let subscriber = logging::subscriber(LogLevel::Warn, sink.clone());
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::warn!("disk almost full");
//!     tracing::info!("filtered out");
//! });
//! assert_eq!(sink.lines(), vec!["W/IOTSDK: disk almost full".to_string()]);
//! ```

use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::sync::Arc;

use iot_config::LogLevel;
use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Tag following the level letter on every line
pub const LOG_TAG: &str = "IOTSDK";

/// Longest line handed to a sink, in bytes
pub const MAX_LINE_LEN: usize = 2047;

/// Destination for formatted SDK log lines
pub trait LogSink: Send + Sync {
    fn write(&self, line: &str);
}

/// Writes `<epoch ms> <line>` to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, line: &str) {
        let now = chrono::Utc::now().timestamp_millis();
        let _ = writeln!(std::io::stderr().lock(), "{} {}", now, line);
    }
}

/// Keeps lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Snapshot of the lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn write(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// `tracing` layer that forwards events to a [`LogSink`]
#[derive(Clone)]
pub struct SinkLayer {
    sink: Arc<dyn LogSink>,
}

impl SinkLayer {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl<S: Subscriber> Layer<S> for SinkLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let mut line = String::with_capacity(
            LOG_TAG.len() + 4 + visitor.message.len() + visitor.fields.len(),
        );
        line.push(level_letter(*event.metadata().level()));
        line.push('/');
        line.push_str(LOG_TAG);
        line.push_str(": ");
        line.push_str(&visitor.message);
        line.push_str(&visitor.fields);
        truncate_line(&mut line, MAX_LINE_LEN);

        self.sink.write(&line);
    }
}

/// Collects the message and `key=value` pairs of one event
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

fn level_letter(level: Level) -> char {
    match level {
        Level::ERROR => 'E',
        Level::WARN => 'W',
        Level::INFO => 'I',
        Level::DEBUG => 'D',
        Level::TRACE => 'V',
    }
}

fn truncate_line(line: &mut String, max: usize) {
    if line.len() <= max {
        return;
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    line.truncate(end);
}

/// Map an SDK log level to a `tracing` filter
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Verbose | LogLevel::All => LevelFilter::TRACE,
    }
}

/// Subscriber that sends SDK logs at or above `level` to `sink`
pub fn subscriber(level: LogLevel, sink: Arc<dyn LogSink>) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(SinkLayer::new(sink).with_filter(level_filter(level)))
}

/// Install [`subscriber`] as the global default
///
/// Fails if a global subscriber is already set.
pub fn init(level: LogLevel, sink: Arc<dyn LogSink>) -> Result<(), TryInitError> {
    subscriber(level, sink).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture<F: FnOnce()>(level: LogLevel, f: F) -> Vec<String> {
        let sink = Arc::new(MemorySink::default());
        tracing::subscriber::with_default(subscriber(level, sink.clone()), f);
        sink.lines()
    }

    #[test]
    fn test_line_format_with_fields() {
        let lines = capture(LogLevel::All, || {
            tracing::error!(kind = "custom", max = 200, "event buffer full");
        });
        assert_eq!(
            lines,
            vec!["E/IOTSDK: event buffer full kind=custom max=200".to_string()]
        );
    }

    #[test]
    fn test_level_letters() {
        let lines = capture(LogLevel::All, || {
            tracing::warn!("w");
            tracing::info!("i");
            tracing::debug!("d");
            tracing::trace!("v");
        });
        assert_eq!(
            lines,
            vec![
                "W/IOTSDK: w".to_string(),
                "I/IOTSDK: i".to_string(),
                "D/IOTSDK: d".to_string(),
                "V/IOTSDK: v".to_string(),
            ]
        );
    }

    #[test]
    fn test_level_filtering() {
        let lines = capture(LogLevel::Error, || {
            tracing::warn!("dropped");
            tracing::error!("kept");
        });
        assert_eq!(lines, vec!["E/IOTSDK: kept".to_string()]);

        let lines = capture(LogLevel::Off, || tracing::error!("dropped"));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_long_lines_truncated() {
        let long = "x".repeat(4096);
        let lines = capture(LogLevel::All, || tracing::info!("{}", long));
        assert_eq!(lines[0].len(), MAX_LINE_LEN);
        assert!(lines[0].starts_with("I/IOTSDK: xxx"));
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let mut line = "aé".to_string();
        truncate_line(&mut line, 2);
        assert_eq!(line, "a");
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter(LogLevel::Off), LevelFilter::OFF);
        assert_eq!(level_filter(LogLevel::Verbose), LevelFilter::TRACE);
        assert_eq!(level_filter(LogLevel::All), LevelFilter::TRACE);
        assert_eq!(level_filter(LogLevel::Info), LevelFilter::INFO);
    }
}
