//! IoT Protocol - Incremental JSON writer for beacon payloads
//!
//! This crate provides the append-only JSON builder used to serialize
//! beacons before they are posted to the collector:
//! - `JsonWriter` - Start/end/add primitives with automatic comma placement
//! - `escape_into` - String escaping for quoted JSON values
//! - `pretty_print` - Indented rendering of a finished document for logs
//!
//! # Design Principles
//!
//! - **Write-only**: The writer never parses; it only emits
//! - **Explicit state**: Comma placement is driven by the last operation
//! - **Deterministic**: Doubles always use six fractional digits
//!
//! # Example
//!
//! ```
//! use iot_protocol::JsonWriter;
//!
//! let mut writer = JsonWriter::new();
//! writer
//!     .start_object(None)
//!     .add_string_key_value("data", "foo")
//!     .end_object();
//!
//! assert_eq!(writer.as_str(), r#"{"data":"foo"}"#);
//! ```

mod escape;
mod pretty;
mod writer;

pub use escape::{escape, escape_into};
pub use pretty::pretty_print;
pub use writer::{JsonWriter, LastOp};

/// Initial writer capacity in bytes (1KB)
pub const DEFAULT_WRITER_CAPACITY: usize = 1024;

// Test modules - only compiled during testing
#[cfg(test)]
mod writer_test;
