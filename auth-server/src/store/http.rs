use super::{DocumentStore, StoreError};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Document store client speaking the storage service wire protocol:
/// one POST endpoint per operation, a `Token` header, JSON bodies.
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    collection: &'a str,
    documents: &'a [Value],
}

#[derive(Debug, Serialize)]
struct ReadRequest<'a> {
    collection: &'a str,
    select: &'a Value,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    collection: &'a str,
    select: &'a Value,
    document: &'a Value,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    collection: &'a str,
    select: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ReadResponse {
    #[serde(default)]
    result: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ChangeResponse {
    #[serde(rename = "Status", default)]
    status: String,
}

impl HttpStore {
    /// Builds a pooled client with bounded round-trip timeouts; the storage
    /// token rides along as a default header on every request.
    pub fn new(base_url: &str, token: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert("Token", HeaderValue::from_str(token)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(2))
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send<B: Serialize, R: DeserializeOwned>(
        &self,
        operation: &str,
        body: &B,
    ) -> Result<R, StoreError> {
        let url = format!("{}/{}", self.base_url, operation);
        debug!("Sending '{}' request to storage at: {}", operation, url);

        let response = self.client.post(&url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::InvalidStatus(response.status()));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn create(&self, collection: &str, documents: Vec<Value>) -> Result<(), StoreError> {
        let response: ChangeResponse = self
            .send(
                "create",
                &CreateRequest {
                    collection,
                    documents: &documents,
                },
            )
            .await?;
        debug!("Storage create on '{}': {}", collection, response.status);
        Ok(())
    }

    async fn read(&self, collection: &str, select: &Value) -> Result<Vec<Value>, StoreError> {
        let response: ReadResponse = self
            .send("read", &ReadRequest { collection, select })
            .await?;
        Ok(response.result)
    }

    async fn update(
        &self,
        collection: &str,
        select: &Value,
        document: &Value,
    ) -> Result<(), StoreError> {
        let response: ChangeResponse = self
            .send(
                "update",
                &UpdateRequest {
                    collection,
                    select,
                    document,
                },
            )
            .await?;
        debug!("Storage update on '{}': {}", collection, response.status);
        Ok(())
    }

    async fn delete(&self, collection: &str, select: &Value) -> Result<(), StoreError> {
        let response: ChangeResponse = self
            .send("delete", &DeleteRequest { collection, select })
            .await?;
        debug!("Storage delete on '{}': {}", collection, response.status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_read_sends_selector_and_token_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/read"))
            .and(header("Token", "secret"))
            .and(body_json(json!({
                "collection": "tokenPermissions",
                "select": {"token": "abc"},
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{"token": "abc"}],
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let store = HttpStore::new(&mock_server.uri(), "secret").unwrap();
        let docs = store
            .read("tokenPermissions", &json!({"token": "abc"}))
            .await
            .unwrap();

        assert_eq!(docs, vec![json!({"token": "abc"})]);
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn test_create_posts_documents_batch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/create"))
            .and(body_json(json!({
                "collection": "refreshTokens",
                "documents": [{"token": "r1"}, {"token": "r2"}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Status": "Ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let store = HttpStore::new(&mock_server.uri(), "secret").unwrap();
        store
            .create(
                "refreshTokens",
                vec![json!({"token": "r1"}), json!({"token": "r2"})],
            )
            .await
            .unwrap();

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/delete"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let store = HttpStore::new(&mock_server.uri(), "secret").unwrap();
        let err = store
            .delete("otpCodes", &json!({"expires_at": {"$lt": 0}}))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidStatus(_)));
    }
}
