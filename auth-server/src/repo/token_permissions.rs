use crate::models::TokenPermission;
use crate::store::{DocumentStore, Store, StoreError};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct TokenPermissionsRepo {
    store: Arc<Store>,
    collection: String,
}

impl TokenPermissionsRepo {
    pub fn new(store: Arc<Store>, collection: String) -> Self {
        Self { store, collection }
    }

    /// Persists one issuance batch. The batch is appended as-is; concurrent
    /// sign-ins for the same user produce independent, additive rows.
    pub async fn save(&self, rows: &[TokenPermission]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        let documents = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.store.create(&self.collection, documents).await
    }

    /// All candidate rows for a check call. Expired rows are filtered out at
    /// read time; their deletion is the reaper's business.
    pub async fn find_active(
        &self,
        token: &str,
        microservice: &str,
        method: &str,
        now: i64,
    ) -> Result<Vec<TokenPermission>, StoreError> {
        let select = json!({
            "token": token,
            "microservice": microservice,
            "method": method,
            "expires_at": {"$gt": now},
        });
        let docs = self.store.read(&self.collection, &select).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }
}
