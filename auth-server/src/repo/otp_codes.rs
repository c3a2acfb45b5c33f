use crate::models::OtpCode;
use crate::store::{DocumentStore, Store, StoreError};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct OtpCodesRepo {
    store: Arc<Store>,
    collection: String,
}

impl OtpCodesRepo {
    pub fn new(store: Arc<Store>, collection: String) -> Self {
        Self { store, collection }
    }

    pub async fn save(&self, otp: &OtpCode) -> Result<(), StoreError> {
        self.store
            .create(&self.collection, vec![serde_json::to_value(otp)?])
            .await
    }

    /// True when an unexpired row matches the (login, code) pair. Expired
    /// codes are invisible here and swept out by the reaper later.
    pub async fn verify(&self, login: &str, code: &str, now: i64) -> Result<bool, StoreError> {
        let select = json!({
            "login": login,
            "code": code,
            "expires_at": {"$gt": now},
        });
        let docs = self.store.read(&self.collection, &select).await?;
        Ok(!docs.is_empty())
    }
}
