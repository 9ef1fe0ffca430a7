//! Document store abstraction
//!
//! The gateways talk to a [`DocumentStore`], a minimal collection/document
//! interface. Two backends implement it:
//!
//! - [`FirestoreClient`]: Google Cloud Firestore over its REST API
//! - [`MemoryStore`]: a process-local map for development and tests
//!
//! # Quick Start
//!
//! ```no_run
//! use gullak::store::{DocumentStore, FirestoreClient, FirestoreConfig};
//! use serde_json::{json, Map};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FirestoreClient::new(FirestoreConfig::new("my-project")).await?;
//!
//!     let mut fields = Map::new();
//!     fields.insert("amount".to_string(), json!(250));
//!     let doc = client.create("expenses", fields).await?;
//!     println!("created {}", doc.id);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod error;
pub mod firestore;
pub mod memory;
pub mod types;

pub use error::{Error, Result};
pub use firestore::{FirestoreClient, FirestoreConfig};
pub use memory::MemoryStore;
pub use types::Document;

/// Collection holding expense records
pub const EXPENSES_COLLECTION: &str = "expenses";

/// Collection holding investment records
pub const INVESTMENTS_COLLECTION: &str = "investments";

/// Interface every document store backend must satisfy
///
/// All operations are single round-trips with no transactional guarantees.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-assigned identity
    async fn create(&self, collection: &str, fields: Map<String, Value>) -> Result<Document>;

    /// Create or overwrite the document with the given identity
    async fn set(&self, collection: &str, id: &str, fields: Map<String, Value>)
        -> Result<Document>;

    /// Fetch a single document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Fetch every document of a collection in store-native order
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Fetch every document whose `field` equals `value`
    async fn find_by(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Document>>;

    /// Delete a document; deleting an absent id succeeds
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}
