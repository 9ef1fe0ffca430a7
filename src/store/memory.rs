use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{error::Result, types::Document, DocumentStore};

/// Process-local document store
///
/// Collections keep insertion order; `set` on an existing id replaces the
/// fields in place. Nothing is persisted.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, fields: Map<String, Value>) -> Result<Document> {
        let doc = Document::new(Uuid::new_v4().simple().to_string(), fields);

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());

        Ok(doc)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Document> {
        let doc = Document::new(id, fields);

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }

        Ok(doc)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}
