//! Structured property values and their JSON encoding
//!
//! The `Properties` column stores a JSON dump of the event's property map.
//! Values form a recursive tagged variant; the encoder walks it and builds a
//! `serde_json::Value`. The output is a diagnostic dump for observability
//! consumers, not a parseable protocol, so round-trip fidelity is not a goal.

use serde_json::{Map, Number, Value};

/// A primitive property value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A named, optionally type-tagged group of values.
///
/// Type tags starting with `DictionaryEntry` or `KeyValuePair` mark the
/// group as a key/value pair: the first named value is the key, the second
/// the value. The tags are a stringly-typed hook exposed by the host and are
/// matched verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredValue {
    pub type_tag: Option<String>,
    pub properties: Vec<(String, PropertyValue)>,
}

/// A recursive property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(ScalarValue),
    Sequence(Vec<PropertyValue>),
    Mapping(Vec<(String, PropertyValue)>),
    Structured(StructuredValue),
}

impl PropertyValue {
    pub const fn null() -> Self {
        PropertyValue::Scalar(ScalarValue::Null)
    }

    /// A structured value without a type tag.
    pub fn structure(properties: Vec<(String, PropertyValue)>) -> Self {
        PropertyValue::Structured(StructuredValue {
            type_tag: None,
            properties,
        })
    }

    /// A structured value with a type tag.
    pub fn tagged_structure(
        type_tag: impl Into<String>,
        properties: Vec<(String, PropertyValue)>,
    ) -> Self {
        PropertyValue::Structured(StructuredValue {
            type_tag: Some(type_tag.into()),
            properties,
        })
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Scalar(ScalarValue::Bool(v))
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Scalar(ScalarValue::Integer(v.into()))
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Scalar(ScalarValue::Integer(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Scalar(ScalarValue::Float(v))
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Scalar(ScalarValue::String(v.into()))
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Scalar(ScalarValue::String(v))
    }
}

/// Encode a property map for the `Properties` column.
///
/// An empty map encodes to the empty string, not `"{}"`.
pub(crate) fn encode_properties(properties: &[(String, PropertyValue)]) -> String {
    if properties.is_empty() {
        return String::new();
    }
    Value::Object(object_from(properties)).to_string()
}

fn object_from(entries: &[(String, PropertyValue)]) -> Map<String, Value> {
    let mut map = Map::with_capacity(entries.len());
    for (name, value) in entries {
        map.insert(name.clone(), to_json(value));
    }
    map
}

fn to_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Scalar(scalar) => scalar_to_json(scalar),
        PropertyValue::Sequence(items) => Value::Array(items.iter().map(to_json).collect()),
        PropertyValue::Mapping(entries) => Value::Object(object_from(entries)),
        PropertyValue::Structured(structured) => structured_to_json(structured),
    }
}

fn scalar_to_json(scalar: &ScalarValue) -> Value {
    match scalar {
        ScalarValue::Null => Value::Null,
        ScalarValue::Bool(b) => Value::Bool(*b),
        ScalarValue::Integer(i) => Value::Number((*i).into()),
        // Non-finite floats have no JSON form.
        ScalarValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        ScalarValue::String(s) => Value::String(s.clone()),
    }
}

fn structured_to_json(structured: &StructuredValue) -> Value {
    if is_key_value_tag(structured.type_tag.as_deref()) {
        if let Some(((_, key), rest)) = structured.properties.split_first() {
            let value = rest.first().map_or(Value::Null, |(_, v)| to_json(v));
            let mut map = Map::with_capacity(1);
            map.insert(key_string(key), value);
            return Value::Object(map);
        }
    }
    Value::Object(object_from(&structured.properties))
}

fn is_key_value_tag(tag: Option<&str>) -> bool {
    tag.is_some_and(|t| t.starts_with("DictionaryEntry") || t.starts_with("KeyValuePair"))
}

/// Render a value as a JSON object key.
fn key_string(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Scalar(ScalarValue::String(s)) => s.clone(),
        PropertyValue::Scalar(ScalarValue::Null) => "null".into(),
        other => to_json(other).to_string(),
    }
}

#[cfg(test)]
#[path = "properties_test.rs"]
mod properties_test;
