use super::sign_in::SignInResult;
use crate::errors::{ApiError, AuthError};
use crate::openapi::AUTHN_TAG;
use crate::state::AppState;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use http::StatusCode;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(super) struct RefreshQuery {
    /// Token returned by a previous sign-in or refresh call
    refresh_token: String,
}

#[utoipa::path(
    post,
    path = "/refresh",
    tag = AUTHN_TAG,
    request_body = RefreshQuery,
    responses(
        (status = 200, description = "New token set issued", body = SignInResult),
        (status = 401, description = "Refresh token unknown or expired"),
        (status = 500, description = "Internal server error")
    )
)]
pub(super) async fn refresh_handler(
    State(state): State<AppState>,
    Json(query): Json<RefreshQuery>,
) -> Response {
    match refresh(&state, &query.refresh_token).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            if matches!(err, AuthError::PlaceholderResolution(_) | AuthError::Store(_)) {
                log::error!("Cannot refresh tokens: {}", err);
            }
            ApiError::from(err).into_response()
        }
    }
}

async fn refresh(state: &AppState, refresh_token: &str) -> Result<SignInResult, AuthError> {
    let now = Utc::now().timestamp();
    let stored = state
        .refresh_tokens
        .find_active(refresh_token, now)
        .await?
        .ok_or(AuthError::Authentication)?;

    let mut user = state
        .users
        .find_by_id(&stored.user_id)
        .await?
        .ok_or(AuthError::Authentication)?;

    let (access_tokens, refresh_token) = state.issuer.issue(&user).await?;
    user.redact_password();

    Ok(SignInResult {
        user,
        access_tokens,
        refresh_token,
    })
}
