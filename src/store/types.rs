use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: its store-assigned identity plus an arbitrary field map
///
/// On the wire the fields are flattened next to `id`, so
/// `Document { id: "a1", fields: {"amount": 5} }` serializes as
/// `{"id": "a1", "amount": 5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identity assigned by the store
    pub id: String,

    /// Document contents
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document from an id and its fields
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Look up a single field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
