use crate::models::User;
use crate::store::{DocumentStore, Store, StoreError};
use serde_json::json;
use std::sync::Arc;

/// Read access to the user collection. Account CRUD lives elsewhere; the
/// engine only needs the credential and id selectors below.
#[derive(Clone)]
pub struct UsersRepo {
    store: Arc<Store>,
    collection: String,
}

impl UsersRepo {
    pub fn new(store: Arc<Store>, collection: String) -> Self {
        Self { store, collection }
    }

    /// Looks up a user whose email or phone equals `login` and whose stored
    /// password hash matches. Returns `None` on a credential mismatch.
    pub async fn find_by_login_and_password(
        &self,
        login: &str,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        let select = json!({
            "$or": [
                {"email": login, "___password": password_hash},
                {"phone": login, "___password": password_hash},
            ],
        });
        let docs = self.store.read(&self.collection, &select).await?;
        match docs.into_iter().next() {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_id(&self, internal_id: &str) -> Result<Option<User>, StoreError> {
        let select = json!({"internal_id": internal_id});
        let docs = self.store.read(&self.collection, &select).await?;
        match docs.into_iter().next() {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }
}
