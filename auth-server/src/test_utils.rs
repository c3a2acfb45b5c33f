use crate::api::sign_in::hash_password;
use crate::config::AuthConfig;
use crate::create_app;
use crate::models::{OtpCode, Role, User};
use crate::state::AppState;
use crate::store::DocumentStore;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;

/// Test fixture wiring the full router against an in-memory document store.
///
/// Seed helpers write documents straight into the store, then requests go
/// through the real handlers via `tower::oneshot`.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     fixture.seed_user("a@example.com", "pw", vec![some_role()]).await;
///
///     let response = fixture
///         .post("/sign_in", &json!({"login": "a@example.com", "password": "pw"}))
///         .await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Application state backing the router
    pub state: AppState,
    /// Configuration the state was built from
    pub config: AuthConfig,
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::with_config(AuthConfig::for_test()).await
    }

    /// Builds a fixture from a customized config, e.g. with a different
    /// flood limit or token TTL.
    pub async fn with_config(config: AuthConfig) -> Self {
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let state = AppState::new(config.clone()).expect("Failed to build app state");
        let app = create_app(state.clone());

        Self { app, state, config }
    }

    /// Inserts a user document with the given roles and a properly salted
    /// password hash, and returns the in-memory copy.
    pub async fn seed_user(&self, login: &str, password: &str, roles: Vec<Role>) -> User {
        let user = User {
            internal_id: format!("u-{login}"),
            email: login.to_string(),
            phone: String::new(),
            hashed_password: hash_password(password, &self.config.salt),
            roles,
            data: Value::Null,
        };
        let document = serde_json::to_value(&user).expect("Failed to serialize user");
        self.state
            .store
            .create(&self.config.storage.collections.users, vec![document])
            .await
            .expect("Failed to seed user");
        user
    }

    /// Inserts a one-time code document as the delivery pipeline would.
    pub async fn seed_otp(&self, otp: OtpCode) {
        let document = serde_json::to_value(&otp).expect("Failed to serialize OTP code");
        self.state
            .store
            .create(&self.config.storage.collections.otp_codes, vec![document])
            .await
            .expect("Failed to seed OTP code");
    }

    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Content-Type", "application/json")
    }

    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn post<T: Serialize>(&self, uri: impl AsRef<str>, body: &T) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(Method::POST, uri)
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST carrying an `X-Real-IP` header, for exercising the
    /// per-client flood accounting.
    pub async fn post_from<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        ip: &str,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(Method::POST, uri)
            .header("X-Real-IP", ip)
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST with a verbatim body, for exercising payloads that are
    /// not valid JSON.
    pub async fn post_raw_from(&self, uri: impl AsRef<str>, ip: &str, body: &str) -> TestResponse {
        let request = self
            .request_builder(Method::POST, uri)
            .header("X-Real-IP", ip)
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        let body = if bytes.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| serde_json::json!({}))
        };

        TestResponse { status, body }
    }
}

/// Response from a test request with the body parsed as JSON.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn assert_ok(&self) {
        assert!(
            self.status.is_success(),
            "Expected success status, got {}: {}",
            self.status,
            self.body
        );
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "Unexpected status, body: {}",
            self.body
        );
    }

    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.body.clone()).expect("Failed to deserialize response body")
    }
}
