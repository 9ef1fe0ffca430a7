//! Conversion between plain JSON and Firestore typed values

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use super::types::{ArrayValue, FirestoreDocument, FirestoreValue, MapValue};
use crate::store::{
    error::{Error, Result},
    types::Document,
};

/// Encode a JSON value as a Firestore value
///
/// Integers that fit in an i64 become `integerValue`; every other number
/// becomes `doubleValue`. Strings stay strings, even RFC 3339 ones.
pub fn to_firestore_value(value: &Value) -> FirestoreValue {
    match value {
        Value::Null => FirestoreValue::NullValue(()),
        Value::Bool(b) => FirestoreValue::BooleanValue(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FirestoreValue::IntegerValue(i.to_string()),
            None => FirestoreValue::DoubleValue(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => FirestoreValue::StringValue(s.clone()),
        Value::Array(items) => FirestoreValue::ArrayValue(ArrayValue {
            values: items.iter().map(to_firestore_value).collect(),
        }),
        Value::Object(map) => FirestoreValue::MapValue(MapValue {
            fields: to_firestore_fields(map),
        }),
    }
}

/// Encode a JSON object as a Firestore field map
pub fn to_firestore_fields(map: &Map<String, Value>) -> BTreeMap<String, FirestoreValue> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_firestore_value(v)))
        .collect()
}

/// Decode a Firestore value into plain JSON
///
/// Timestamps, bytes and references decode to their string form; geo points
/// decode to `{"latitude", "longitude"}`.
pub fn from_firestore_value(value: &FirestoreValue) -> Result<Value> {
    let decoded = match value {
        FirestoreValue::NullValue(()) => Value::Null,
        FirestoreValue::BooleanValue(b) => Value::Bool(*b),
        FirestoreValue::IntegerValue(s) => {
            let i = s.parse::<i64>().map_err(|e| {
                Error::InvalidDocument(format!("integerValue '{}' is not an int64: {}", s, e))
            })?;
            Value::Number(Number::from(i))
        }
        FirestoreValue::DoubleValue(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FirestoreValue::TimestampValue(s)
        | FirestoreValue::StringValue(s)
        | FirestoreValue::BytesValue(s)
        | FirestoreValue::ReferenceValue(s) => Value::String(s.clone()),
        FirestoreValue::GeoPointValue(point) => serde_json::json!({
            "latitude": point.latitude,
            "longitude": point.longitude,
        }),
        FirestoreValue::ArrayValue(array) => Value::Array(
            array
                .values
                .iter()
                .map(from_firestore_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        FirestoreValue::MapValue(map) => Value::Object(from_firestore_fields(&map.fields)?),
    };
    Ok(decoded)
}

/// Decode a Firestore field map into a JSON object
pub fn from_firestore_fields(fields: &BTreeMap<String, FirestoreValue>) -> Result<Map<String, Value>> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), from_firestore_value(v)?)))
        .collect()
}

/// Extract the document id (last path segment) from a resource name
pub fn document_id(name: &str) -> Option<&str> {
    name.rsplit('/').next().filter(|id| !id.is_empty())
}

/// Convert a REST document resource into a [`Document`]
pub fn into_document(doc: FirestoreDocument) -> Result<Document> {
    let name = doc
        .name
        .as_deref()
        .ok_or_else(|| Error::InvalidDocument("document has no name".to_string()))?;
    let id = document_id(name)
        .ok_or_else(|| Error::InvalidDocument(format!("cannot derive id from '{}'", name)))?;

    Ok(Document::new(id, from_firestore_fields(&doc.fields)?))
}
