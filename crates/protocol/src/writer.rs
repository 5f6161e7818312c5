//! JsonWriter - Append-only JSON document builder
//!
//! The writer tracks the last operation it performed and uses it to decide
//! whether a comma is needed before the next element. Callers are expected
//! to balance `start_*`/`end_*` calls; the writer does not validate nesting.
//!
//! # Comma Rule
//!
//! A comma is written before an element unless the previous operation was
//! `Init`, `StartArray` or `StartObject`. Closing brackets never take a
//! leading comma.

use std::fmt::Write;

use crate::DEFAULT_WRITER_CAPACITY;
use crate::escape::escape_into;

/// Last operation performed by a [`JsonWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastOp {
    /// Nothing written yet
    Init,
    /// Opened an array
    StartArray,
    /// Opened an object
    StartObject,
    /// Wrote a value or key/value pair
    AddData,
    /// Closed an object
    EndObject,
    /// Closed an array
    EndArray,
}

impl LastOp {
    /// Whether the next element needs a separating comma
    #[inline]
    fn needs_comma(self) -> bool {
        !matches!(self, Self::Init | Self::StartArray | Self::StartObject)
    }
}

/// Container kinds the writer can open and close
#[derive(Debug, Clone, Copy)]
enum Container {
    Array,
    Object,
}

impl Container {
    #[inline]
    fn open(self) -> char {
        match self {
            Self::Array => '[',
            Self::Object => '{',
        }
    }

    #[inline]
    fn close(self) -> char {
        match self {
            Self::Array => ']',
            Self::Object => '}',
        }
    }
}

/// Incremental JSON writer
///
/// # Example
///
/// ```
/// use iot_protocol::JsonWriter;
///
/// let mut writer = JsonWriter::new();
/// writer
///     .start_object(None)
///     .start_array(Some("data"))
///     .add_integer_value(1)
///     .add_boolean_value(true)
///     .end_array()
///     .end_object();
///
/// assert_eq!(writer.as_str(), r#"{"data":[1,true]}"#);
/// ```
#[derive(Debug, Clone)]
pub struct JsonWriter {
    buf: String,
    last_op: LastOp,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    /// Create a writer with the default initial capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WRITER_CAPACITY)
    }

    /// Create a writer with a specific initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            last_op: LastOp::Init,
        }
    }

    /// Open an array, optionally as the value of `name`
    pub fn start_array(&mut self, name: Option<&str>) -> &mut Self {
        self.start(Container::Array, name);
        self.last_op = LastOp::StartArray;
        self
    }

    /// Open an object, optionally as the value of `name`
    pub fn start_object(&mut self, name: Option<&str>) -> &mut Self {
        self.start(Container::Object, name);
        self.last_op = LastOp::StartObject;
        self
    }

    /// Close the current array
    pub fn end_array(&mut self) -> &mut Self {
        self.push(Container::Array.close());
        self.last_op = LastOp::EndArray;
        self
    }

    /// Close the current object
    pub fn end_object(&mut self) -> &mut Self {
        self.push(Container::Object.close());
        self.last_op = LastOp::EndObject;
        self
    }

    /// Write `"key":"value"` with the value escaped
    pub fn add_string_key_value(&mut self, key: &str, value: &str) -> &mut Self {
        self.begin_member(Some(key));
        self.write_string(value);
        self.last_op = LastOp::AddData;
        self
    }

    /// Write `"key":123`
    pub fn add_integer_key_value(&mut self, key: &str, value: i64) -> &mut Self {
        self.begin_member(Some(key));
        self.write_integer(value);
        self.last_op = LastOp::AddData;
        self
    }

    /// Write `"key":1.500000`
    pub fn add_double_key_value(&mut self, key: &str, value: f64) -> &mut Self {
        self.begin_member(Some(key));
        self.write_double(value);
        self.last_op = LastOp::AddData;
        self
    }

    /// Write `"key":true`
    pub fn add_boolean_key_value(&mut self, key: &str, value: bool) -> &mut Self {
        self.begin_member(Some(key));
        self.write_boolean(value);
        self.last_op = LastOp::AddData;
        self
    }

    /// Write a bare string element
    pub fn add_string_value(&mut self, value: &str) -> &mut Self {
        self.begin_member(None);
        self.write_string(value);
        self.last_op = LastOp::AddData;
        self
    }

    /// Write a bare integer element
    pub fn add_integer_value(&mut self, value: i64) -> &mut Self {
        self.begin_member(None);
        self.write_integer(value);
        self.last_op = LastOp::AddData;
        self
    }

    /// Write a bare double element
    pub fn add_double_value(&mut self, value: f64) -> &mut Self {
        self.begin_member(None);
        self.write_double(value);
        self.last_op = LastOp::AddData;
        self
    }

    /// Write a bare boolean element
    pub fn add_boolean_value(&mut self, value: bool) -> &mut Self {
        self.begin_member(None);
        self.write_boolean(value);
        self.last_op = LastOp::AddData;
        self
    }

    /// The document written so far
    ///
    /// Empty until the first `start_*` call.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consume the writer and return the document
    #[inline]
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Last operation performed
    #[inline]
    pub fn last_op(&self) -> LastOp {
        self.last_op
    }

    /// Bytes written
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current buffer capacity in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    fn start(&mut self, container: Container, name: Option<&str>) {
        self.begin_member(name);
        self.push(container.open());
    }

    /// Comma (if needed) followed by an optional `"key":` prefix
    fn begin_member(&mut self, key: Option<&str>) {
        if self.last_op.needs_comma() {
            self.push(',');
        }
        if let Some(key) = key {
            self.reserve(key.len() + 3);
            self.buf.push('"');
            escape_into(&mut self.buf, key);
            self.buf.push_str("\":");
        }
    }

    fn write_string(&mut self, value: &str) {
        self.reserve(value.len() + 2);
        self.buf.push('"');
        escape_into(&mut self.buf, value);
        self.buf.push('"');
    }

    fn write_integer(&mut self, value: i64) {
        // i64::MIN is 20 characters
        self.reserve(20);
        let _ = write!(self.buf, "{value}");
    }

    fn write_double(&mut self, value: f64) {
        if value.is_nan() {
            self.reserve(3);
            self.buf.push_str("nan");
            return;
        }
        self.reserve(32);
        let _ = write!(self.buf, "{value:.6}");
    }

    fn write_boolean(&mut self, value: bool) {
        self.reserve(5);
        self.buf.push_str(if value { "true" } else { "false" });
    }

    #[inline]
    fn push(&mut self, ch: char) {
        self.reserve(ch.len_utf8());
        self.buf.push(ch);
    }

    /// Double capacity until `additional` more bytes fit
    fn reserve(&mut self, additional: usize) {
        let needed = self.buf.len() + additional;
        let capacity = self.buf.capacity();
        if needed <= capacity {
            return;
        }
        let mut target = capacity.max(1);
        while target < needed {
            target *= 2;
        }
        self.buf.reserve_exact(target - self.buf.len());
    }
}
