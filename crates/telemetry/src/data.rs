//! Typed event properties.
//!
//! [`EventData`] is the key/value bag attached to every event (and used for
//! captured response headers). Values are kept in one ordered map per type,
//! so serialization emits keys in sorted order. A key lives in at most one
//! of the maps: writing it with a new type moves it.

use std::collections::BTreeMap;

use tracing::warn;

/// Character reserved by the collector as a field separator
pub const RESERVED_DELIMITER: char = '|';

/// A typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    /// Milliseconds since the Unix epoch
    Datetime(i64),
}

impl DataValue {
    /// Type name as shown in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "STRING",
            Self::Integer(_) => "INTEGER",
            Self::Double(_) => "DOUBLE",
            Self::Boolean(_) => "BOOLEAN",
            Self::Datetime(_) => "DATETIME",
        }
    }

    /// String payload, if this is a string
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A caller-supplied key/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct DataField {
    pub key: String,
    pub value: DataValue,
}

impl DataField {
    /// Create a field from any value convertible to [`DataValue`]
    pub fn new(key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a datetime field (ms since epoch)
    pub fn datetime(key: impl Into<String>, millis: i64) -> Self {
        Self {
            key: key.into(),
            value: DataValue::Datetime(millis),
        }
    }
}

/// Typed property maps for one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventData {
    strings: BTreeMap<String, String>,
    integers: BTreeMap<String, i64>,
    doubles: BTreeMap<String, f64>,
    booleans: BTreeMap<String, bool>,
    datetimes: BTreeMap<String, i64>,
}

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any earlier value of any type
    ///
    /// The reserved delimiter is stripped from the key. Returns `false` and
    /// stores nothing when the key is empty after stripping.
    pub fn set(&mut self, key: &str, value: DataValue) -> bool {
        let key = strip_delimiter(key);
        if key.is_empty() {
            warn!(value_type = value.type_name(), "skipping property with empty key");
            return false;
        }

        self.remove(&key);
        match value {
            DataValue::String(v) => {
                self.strings.insert(key, v);
            }
            DataValue::Integer(v) => {
                self.integers.insert(key, v);
            }
            DataValue::Double(v) => {
                self.doubles.insert(key, v);
            }
            DataValue::Boolean(v) => {
                self.booleans.insert(key, v);
            }
            DataValue::Datetime(v) => {
                self.datetimes.insert(key, v);
            }
        }
        true
    }

    /// Copy caller fields, skipping invalid ones
    ///
    /// Returns how many fields were stored.
    pub fn extend_from_fields<'a, I>(&mut self, fields: I) -> usize
    where
        I: IntoIterator<Item = &'a DataField>,
    {
        fields
            .into_iter()
            .filter(|field| self.set(&field.key, field.value.clone()))
            .count()
    }

    /// Look up a value by key in whichever map holds it
    pub fn get(&self, key: &str) -> Option<DataValue> {
        if let Some(v) = self.strings.get(key) {
            return Some(DataValue::String(v.clone()));
        }
        if let Some(v) = self.integers.get(key) {
            return Some(DataValue::Integer(*v));
        }
        if let Some(v) = self.doubles.get(key) {
            return Some(DataValue::Double(*v));
        }
        if let Some(v) = self.booleans.get(key) {
            return Some(DataValue::Boolean(*v));
        }
        self.datetimes.get(key).map(|v| DataValue::Datetime(*v))
    }

    /// Remove `key` from every map
    pub fn remove(&mut self, key: &str) {
        self.strings.remove(key);
        self.integers.remove(key);
        self.doubles.remove(key);
        self.booleans.remove(key);
        self.datetimes.remove(key);
    }

    pub fn clear(&mut self) {
        self.strings.clear();
        self.integers.clear();
        self.doubles.clear();
        self.booleans.clear();
        self.datetimes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
            && self.integers.is_empty()
            && self.doubles.is_empty()
            && self.booleans.is_empty()
            && self.datetimes.is_empty()
    }

    /// Total number of properties
    pub fn len(&self) -> usize {
        self.strings.len()
            + self.integers.len()
            + self.doubles.len()
            + self.booleans.len()
            + self.datetimes.len()
    }

    #[inline]
    pub fn strings(&self) -> &BTreeMap<String, String> {
        &self.strings
    }

    #[inline]
    pub fn integers(&self) -> &BTreeMap<String, i64> {
        &self.integers
    }

    #[inline]
    pub fn doubles(&self) -> &BTreeMap<String, f64> {
        &self.doubles
    }

    #[inline]
    pub fn booleans(&self) -> &BTreeMap<String, bool> {
        &self.booleans
    }

    #[inline]
    pub fn datetimes(&self) -> &BTreeMap<String, i64> {
        &self.datetimes
    }
}

/// Remove every reserved delimiter from `value`
pub fn strip_delimiter(value: &str) -> String {
    if value.contains(RESERVED_DELIMITER) {
        warn!(value, "stripping reserved '|' character");
        value.replace(RESERVED_DELIMITER, "")
    } else {
        value.to_string()
    }
}
