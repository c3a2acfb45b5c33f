use crate::store::StoreError;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Engine failure taxonomy.
///
/// `Authentication` and `FloodRejected` are expected, first-class outcomes
/// with stable response shapes; only `PlaceholderResolution` and `Store`
/// represent engine faults. A denied authorization check is not an error at
/// all; `/check` answers `200 {"authorized": false}`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("login or password is incorrect")]
    Authentication,
    #[error("placeholder '{0}' did not resolve to a string value")]
    PlaceholderResolution(String),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("too many failed attempts, try again later")]
    FloodRejected,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub detail: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a detail message and status code
    pub fn new<S: ToString>(detail: S, status_code: StatusCode) -> Self {
        Self {
            detail: detail.to_string(),
            status_code,
        }
    }

    /// Create new Internal Server Error (500) with a detail message
    pub fn internal<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Create new Bad Request Error (400) with a detail message
    #[allow(dead_code)]
    pub fn bad_request<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::BAD_REQUEST)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = json!({
            "detail": self.detail,
        });
        (status_code, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status_code = match &err {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Authentication => StatusCode::UNAUTHORIZED,
            AuthError::FloodRejected => StatusCode::TOO_MANY_REQUESTS,
            AuthError::PlaceholderResolution(_) | AuthError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError::new(err, status_code)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        ApiError::from(self).into_response()
    }
}
