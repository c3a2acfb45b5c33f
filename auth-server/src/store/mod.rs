use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod http;
pub mod memory;

/// Errors that can occur while talking to the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to build storage client: {0}")]
    Build(#[from] reqwest::header::InvalidHeaderValue),
    #[error("failed to send request to storage: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage request failed with status: {0}")]
    InvalidStatus(reqwest::StatusCode),
    #[error("failed to parse storage response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Contract consumed from the external document store collaborator.
///
/// Collections hold arbitrary JSON documents; the selector grammar used by
/// this service is field equality (dot-paths allowed), `$or` over
/// sub-selectors, and `$gt`/`$gte`/`$lt` comparisons on a single field (used
/// exclusively for expiry filtering).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append documents to a collection
    async fn create(&self, collection: &str, documents: Vec<Value>) -> Result<(), StoreError>;

    /// Read all documents matching the selector
    async fn read(&self, collection: &str, select: &Value) -> Result<Vec<Value>, StoreError>;

    /// Shallow-merge the patch into every document matching the selector
    async fn update(
        &self,
        collection: &str,
        select: &Value,
        document: &Value,
    ) -> Result<(), StoreError>;

    /// Delete all documents matching the selector
    async fn delete(&self, collection: &str, select: &Value) -> Result<(), StoreError>;
}

/// Store implementation chosen at runtime from configuration.
#[derive(Clone)]
pub enum Store {
    /// External store reached over HTTP
    Http(http::HttpStore),
    /// In-process store for tests and single-node deployments
    Memory(memory::MemoryStore),
}

#[async_trait]
impl DocumentStore for Store {
    async fn create(&self, collection: &str, documents: Vec<Value>) -> Result<(), StoreError> {
        match self {
            Self::Http(store) => store.create(collection, documents).await,
            Self::Memory(store) => store.create(collection, documents).await,
        }
    }

    async fn read(&self, collection: &str, select: &Value) -> Result<Vec<Value>, StoreError> {
        match self {
            Self::Http(store) => store.read(collection, select).await,
            Self::Memory(store) => store.read(collection, select).await,
        }
    }

    async fn update(
        &self,
        collection: &str,
        select: &Value,
        document: &Value,
    ) -> Result<(), StoreError> {
        match self {
            Self::Http(store) => store.update(collection, select, document).await,
            Self::Memory(store) => store.update(collection, select, document).await,
        }
    }

    async fn delete(&self, collection: &str, select: &Value) -> Result<(), StoreError> {
        match self {
            Self::Http(store) => store.delete(collection, select).await,
            Self::Memory(store) => store.delete(collection, select).await,
        }
    }
}

/// Factory function creating the configured store backend.
pub fn create_store(config: &crate::config::AuthConfig) -> Result<Store, StoreError> {
    match config.storage.store {
        crate::config::StorageBackend::Http => {
            let store = http::HttpStore::new(&config.storage.url, &config.storage.token)?;
            Ok(Store::Http(store))
        }
        crate::config::StorageBackend::InMemory => Ok(Store::Memory(memory::MemoryStore::new())),
    }
}
