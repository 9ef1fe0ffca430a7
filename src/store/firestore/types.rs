//! Firestore REST request and response types
//!
//! These types map directly to the Firestore v1 REST schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed Firestore value
///
/// Serialized as a single-key object, e.g. `{"stringValue": "food"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue(()),
    BooleanValue(bool),
    /// int64 travels as a decimal string
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

/// Latitude/longitude pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// Array payload; `values` is omitted for empty arrays
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

/// Map payload; `fields` is omitted for empty maps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

/// A document resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    /// Full resource name, `projects/{p}/databases/{d}/documents/{collection}/{id}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

/// Response of `GET .../documents/{collection}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<FirestoreDocument>,
    pub next_page_token: Option<String>,
}

/// Body of `POST .../documents:runQuery`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_filter: FieldFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: FieldOperator,
    pub value: FirestoreValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

/// Comparison operators supported by field filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldOperator {
    Equal,
}

/// One element of the `runQuery` response array
///
/// Elements that only report progress carry no `document`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponseItem {
    pub document: Option<FirestoreDocument>,
    pub read_time: Option<String>,
}

impl RunQueryRequest {
    /// Build an equality query over a single collection
    pub fn field_equals(collection: &str, field: &str, value: FirestoreValue) -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                filter: Some(Filter {
                    field_filter: FieldFilter {
                        field: FieldReference {
                            field_path: field.to_string(),
                        },
                        op: FieldOperator::Equal,
                        value,
                    },
                }),
            },
        }
    }
}
