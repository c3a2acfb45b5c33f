use crate::errors::ApiError;
use crate::openapi::AUTHZ_TAG;
use crate::state::AppState;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[utoipa::path(
    post,
    path = "/check",
    tag = AUTHZ_TAG,
    request_body = CheckQuery,
    responses(
        (status = 200, description = "Check completed; a denial is a normal result", body = CheckResult),
        (status = 422, description = "Invalid request payload"),
        (status = 500, description = "Internal server error")
    )
)]
pub(super) async fn check_handler(
    State(state): State<AppState>,
    Json(query): Json<CheckQuery>,
) -> Response {
    match state
        .matcher
        .check(&query.token, &query.microservice, &query.method, &query.data)
        .await
    {
        Ok(authorized) => (StatusCode::OK, Json(CheckResult { authorized })).into_response(),
        Err(err) => {
            log::error!(
                "Authorization check failed for {}/{}: {}",
                query.microservice,
                query.method,
                err
            );
            ApiError::from(err).into_response()
        }
    }
}

/// Authorization check parameters
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub(crate) struct CheckQuery {
    /// Bearer token presented by the caller
    pub token: String,
    /// Target microservice
    pub microservice: String,
    /// Target method
    pub method: String,
    /// Request payload inspected by the stored param constraints
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Response type for the check endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub(crate) struct CheckResult {
    /// Whether the call is authorized
    pub authorized: bool,
}
