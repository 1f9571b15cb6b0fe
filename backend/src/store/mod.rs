//! Seam to the external keyed document store. The storage engine itself is an
//! external collaborator; only the lookup and insert-only write operations
//! this subsystem needs are modeled here.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document already exists: {collection}/{key}")]
    AlreadyExists { collection: String, key: String },
    #[error("store backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Insert-only write; fails with `AlreadyExists` when the key is taken.
    /// Existing documents are never overwritten through this seam.
    async fn create(&self, collection: &str, key: &str, document: Value)
        -> Result<(), StoreError>;
}

/// In-process store used by the binary and the test suites. Keyed writes are
/// atomic under the lock, so concurrent creators race cleanly: one wins, the
/// rest observe `AlreadyExists`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection. Test observability helper.
    pub async fn count(&self, collection: &str) -> usize {
        self.documents
            .read()
            .await
            .keys()
            .filter(|(c, _)| c == collection)
            .count()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }

    async fn create(
        &self,
        collection: &str,
        key: &str,
        document: Value,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let entry = documents.entry((collection.to_string(), key.to_string()));
        match entry {
            std::collections::hash_map::Entry::Occupied(_) => Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                key: key.to_string(),
            }),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(document);
                Ok(())
            }
        }
    }
}
