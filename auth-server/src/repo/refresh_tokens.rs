use crate::models::RefreshToken;
use crate::store::{DocumentStore, Store, StoreError};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct RefreshTokensRepo {
    store: Arc<Store>,
    collection: String,
}

impl RefreshTokensRepo {
    pub fn new(store: Arc<Store>, collection: String) -> Self {
        Self { store, collection }
    }

    pub async fn save(&self, token: &RefreshToken) -> Result<(), StoreError> {
        self.store
            .create(&self.collection, vec![serde_json::to_value(token)?])
            .await
    }

    /// Looks up an unexpired refresh token row.
    pub async fn find_active(
        &self,
        token: &str,
        now: i64,
    ) -> Result<Option<RefreshToken>, StoreError> {
        let select = json!({"token": token, "expires_at": {"$gt": now}});
        let docs = self.store.read(&self.collection, &select).await?;
        match docs.into_iter().next() {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }
}
