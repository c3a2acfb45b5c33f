use crate::errors::ApiError;
use crate::openapi::AUTHN_TAG;
use crate::state::AppState;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(super) struct VerifyOtpQuery {
    /// Email or phone the code was sent to
    login: String,
    otp_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(super) struct VerifyOtpResult {
    valid: bool,
}

#[utoipa::path(
    post,
    path = "/verify_otp",
    tag = AUTHN_TAG,
    request_body = VerifyOtpQuery,
    responses(
        (status = 200, description = "Verification outcome", body = VerifyOtpResult),
        (status = 500, description = "Internal server error")
    )
)]
pub(super) async fn verify_otp_handler(
    State(state): State<AppState>,
    Json(query): Json<VerifyOtpQuery>,
) -> Response {
    let now = Utc::now().timestamp();
    match state
        .otp_codes
        .verify(&query.login, &query.otp_code, now)
        .await
    {
        Ok(valid) => (StatusCode::OK, Json(VerifyOtpResult { valid })).into_response(),
        Err(err) => {
            log::error!("Cannot verify OTP code: {}", err);
            ApiError::internal(err.to_string()).into_response()
        }
    }
}
