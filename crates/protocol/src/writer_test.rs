//! Tests for the incremental JSON writer

use crate::writer::{JsonWriter, LastOp};

// =============================================================================
// Single values
// =============================================================================

#[test]
fn test_string_key_value() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .add_string_key_value("data", "foo")
        .end_object();

    assert_eq!(writer.as_str(), r#"{"data":"foo"}"#);
}

#[test]
fn test_integer_key_value_max() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .add_integer_key_value("data", i64::MAX)
        .end_object();

    assert_eq!(writer.as_str(), r#"{"data":9223372036854775807}"#);
}

#[test]
fn test_integer_key_value_negative() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .add_integer_key_value("data", i64::MIN)
        .end_object();

    assert_eq!(writer.as_str(), r#"{"data":-9223372036854775808}"#);
}

#[test]
fn test_double_key_value_six_digits() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .add_double_key_value("data", 92233727.18878)
        .end_object();

    assert_eq!(writer.as_str(), r#"{"data":92233727.188780}"#);
}

#[test]
fn test_double_whole_number_keeps_fraction() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .add_double_key_value("data", 2.0)
        .end_object();

    assert_eq!(writer.as_str(), r#"{"data":2.000000}"#);
}

#[test]
fn test_boolean_key_values() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .add_boolean_key_value("yes", true)
        .add_boolean_key_value("no", false)
        .end_object();

    assert_eq!(writer.as_str(), r#"{"yes":true,"no":false}"#);
}

#[test]
fn test_string_value_escaped() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .add_string_key_value("url", "http://foo.bar/?baz=qux#quux")
        .end_object();

    assert_eq!(writer.as_str(), r#"{"url":"http:\/\/foo.bar\/?baz=qux#quux"}"#);
}

// =============================================================================
// Arrays and nesting
// =============================================================================

#[test]
fn test_mixed_array() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .start_array(Some("data"))
        .add_integer_value(1)
        .add_integer_value(2)
        .add_double_value(3.654654)
        .add_string_value("foo")
        .add_boolean_value(true)
        .end_array()
        .end_object();

    assert_eq!(writer.as_str(), r#"{"data":[1,2,3.654654,"foo",true]}"#);
}

#[test]
fn test_array_of_objects() {
    let mut writer = JsonWriter::new();
    writer.start_object(None).start_array(Some("data"));
    for value in ["bar", "baz"] {
        writer
            .start_object(None)
            .add_string_key_value("foo", value)
            .end_object();
    }
    writer.end_array().end_object();

    assert_eq!(
        writer.as_str(),
        r#"{"data":[{"foo":"bar"},{"foo":"baz"}]}"#
    );
}

#[test]
fn test_deeply_nested_objects() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .start_array(Some("data"))
        .start_object(None)
        .start_object(Some("foo"))
        .start_object(Some("bar"))
        .add_boolean_key_value("baz", false)
        .end_object()
        .end_object()
        .end_object()
        .end_array()
        .end_object();

    assert_eq!(
        writer.as_str(),
        r#"{"data":[{"foo":{"bar":{"baz":false}}}]}"#
    );
}

#[test]
fn test_tree_with_siblings_after_close() {
    let mut writer = JsonWriter::new();
    writer
        .start_object(None)
        .add_integer_key_value("value", 2)
        .start_object(Some("subtree"))
        .add_string_key_value("meta", "child")
        .start_array(Some("nodes"))
        .start_object(None)
        .add_double_key_value("value", 2.124124)
        .end_object()
        .start_object(None)
        .add_double_key_value("value", 2.234234)
        .end_object()
        .end_array()
        .end_object()
        .end_object();

    assert_eq!(
        writer.as_str(),
        r#"{"value":2,"subtree":{"meta":"child","nodes":[{"value":2.124124},{"value":2.234234}]}}"#
    );
}

#[test]
fn test_output_parses_as_json() {
    let mut writer = JsonWriter::new();
    writer
        .start_array(None)
        .start_object(None)
        .add_string_key_value("quote", "say \"hi\"\n")
        .start_array(Some("empty"))
        .end_array()
        .add_double_key_value("pi", 3.14159)
        .end_object()
        .end_array();

    let parsed: serde_json::Value = serde_json::from_str(writer.as_str()).unwrap();
    assert_eq!(parsed[0]["quote"], "say \"hi\"\n");
    assert_eq!(parsed[0]["empty"], serde_json::json!([]));
    assert_eq!(parsed[0]["pi"], 3.14159);
}

// =============================================================================
// State and buffer
// =============================================================================

#[test]
fn test_empty_before_start() {
    let writer = JsonWriter::new();
    assert_eq!(writer.as_str(), "");
    assert!(writer.is_empty());
    assert_eq!(writer.last_op(), LastOp::Init);
}

#[test]
fn test_last_op_tracking() {
    let mut writer = JsonWriter::new();
    writer.start_object(None);
    assert_eq!(writer.last_op(), LastOp::StartObject);
    writer.start_array(Some("a"));
    assert_eq!(writer.last_op(), LastOp::StartArray);
    writer.add_integer_value(1);
    assert_eq!(writer.last_op(), LastOp::AddData);
    writer.end_array();
    assert_eq!(writer.last_op(), LastOp::EndArray);
    writer.end_object();
    assert_eq!(writer.last_op(), LastOp::EndObject);
}

#[test]
fn test_buffer_grows_by_doubling() {
    let mut writer = JsonWriter::with_capacity(4);
    writer.start_array(None);
    for _ in 0..100 {
        writer.add_string_value("abcdefgh");
    }
    writer.end_array();

    assert!(writer.capacity() >= writer.len());
    assert_eq!(writer.len(), 2 + 100 * 10 + 99);
}

#[test]
fn test_into_string() {
    let mut writer = JsonWriter::new();
    writer.start_array(None).end_array();
    assert_eq!(writer.into_string(), "[]");
}
