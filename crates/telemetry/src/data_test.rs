//! Tests for EventData and property values

use crate::data::{DataField, DataValue, EventData, strip_delimiter};

// =============================================================================
// set / get
// =============================================================================

#[test]
fn test_set_each_type() {
    let mut data = EventData::new();
    assert!(data.set("s", DataValue::from("text")));
    assert!(data.set("i", DataValue::from(7i64)));
    assert!(data.set("d", DataValue::from(1.5)));
    assert!(data.set("b", DataValue::from(true)));
    assert!(data.set("t", DataValue::Datetime(1_000)));

    assert_eq!(data.len(), 5);
    assert_eq!(data.strings().get("s").map(String::as_str), Some("text"));
    assert_eq!(data.integers().get("i"), Some(&7));
    assert_eq!(data.doubles().get("d"), Some(&1.5));
    assert_eq!(data.booleans().get("b"), Some(&true));
    assert_eq!(data.datetimes().get("t"), Some(&1_000));
}

#[test]
fn test_last_write_wins_same_type() {
    let mut data = EventData::new();
    data.set("k", DataValue::Integer(1));
    data.set("k", DataValue::Integer(2));

    assert_eq!(data.len(), 1);
    assert_eq!(data.get("k"), Some(DataValue::Integer(2)));
}

#[test]
fn test_key_moves_between_maps() {
    let mut data = EventData::new();
    data.set("k", DataValue::Integer(1));
    data.set("k", DataValue::String("s".to_string()));

    assert_eq!(data.get("k"), Some(DataValue::String("s".to_string())));
    assert!(data.integers().is_empty());
    assert_eq!(data.len(), 1);

    data.set("k", DataValue::Datetime(5));
    assert!(data.strings().is_empty());
    assert_eq!(data.get("k"), Some(DataValue::Datetime(5)));
}

#[test]
fn test_delimiter_stripped_from_keys() {
    let mut data = EventData::new();
    data.set("a|b", DataValue::Boolean(false));

    assert_eq!(data.get("ab"), Some(DataValue::Boolean(false)));
    assert!(data.get("a|b").is_none());
}

#[test]
fn test_empty_key_rejected() {
    let mut data = EventData::new();
    assert!(!data.set("", DataValue::Integer(1)));
    assert!(!data.set("||", DataValue::Integer(1)));
    assert!(data.is_empty());
}

#[test]
fn test_keys_iterate_sorted() {
    let mut data = EventData::new();
    for key in ["zeta", "alpha", "mid"] {
        data.set(key, DataValue::Integer(0));
    }
    let keys: Vec<&str> = data.integers().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
}

// =============================================================================
// extend / clear
// =============================================================================

#[test]
fn test_extend_partial_success() {
    let fields = vec![
        DataField::new("good", 1i64),
        DataField::new("", 2i64),
        DataField::new("also|good", "x"),
    ];

    let mut data = EventData::new();
    assert_eq!(data.extend_from_fields(&fields), 2);
    assert_eq!(data.get("alsogood"), Some(DataValue::String("x".to_string())));
}

#[test]
fn test_clear_and_remove() {
    let mut data = EventData::new();
    data.set("a", DataValue::Integer(1));
    data.set("b", DataValue::Double(2.0));

    data.remove("a");
    assert_eq!(data.len(), 1);

    data.clear();
    assert!(data.is_empty());
    assert_eq!(data, EventData::default());
}

// =============================================================================
// Values
// =============================================================================

#[test]
fn test_value_type_names() {
    assert_eq!(DataValue::from("x").type_name(), "STRING");
    assert_eq!(DataValue::from(1i64).type_name(), "INTEGER");
    assert_eq!(DataValue::from(1.0).type_name(), "DOUBLE");
    assert_eq!(DataValue::from(false).type_name(), "BOOLEAN");
    assert_eq!(DataValue::Datetime(0).type_name(), "DATETIME");
}

#[test]
fn test_value_as_str() {
    assert_eq!(DataValue::from("x").as_str(), Some("x"));
    assert_eq!(DataValue::from(1i64).as_str(), None);
}

#[test]
fn test_datetime_field() {
    let field = DataField::datetime("when", 42);
    assert_eq!(field.value, DataValue::Datetime(42));
}

#[test]
fn test_strip_delimiter() {
    assert_eq!(strip_delimiter("a|b|c"), "abc");
    assert_eq!(strip_delimiter("plain"), "plain");
    assert_eq!(strip_delimiter("|"), "");
}
