use crate::errors::{ApiError, AuthError};
use crate::headers::client_ip;
use crate::models::{AccessToken, RefreshToken, User};
use crate::openapi::AUTHN_TAG;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

#[utoipa::path(
    post,
    path = "/sign_in",
    tag = AUTHN_TAG,
    responses(
        (status = 200, description = "Credentials accepted, tokens issued", body = SignInResult),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Unknown login or wrong password"),
        (status = 429, description = "Flood guard rejected the attempt"),
        (status = 500, description = "Internal server error")
    )
)]
pub(super) async fn sign_in_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let ip = client_ip(&headers);

    // The flood decision comes before any credential work
    if !state.flood.admit(&ip) {
        log::info!("Flood guard rejected sign-in from {}", ip);
        return ApiError::from(AuthError::FloodRejected).into_response();
    }

    // A body that does not even parse as JSON still counts as a failed attempt
    let Ok(Json(body)) = body else {
        state.flood.record(&ip);
        return ApiError::from(AuthError::Validation(
            "request body must be a JSON object".to_string(),
        ))
        .into_response();
    };

    match sign_in(&state, &ip, &body).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            if matches!(err, AuthError::PlaceholderResolution(_) | AuthError::Store(_)) {
                log::error!("Cannot issue tokens: {}", err);
            }
            ApiError::from(err).into_response()
        }
    }
}

async fn sign_in(state: &AppState, ip: &str, body: &Value) -> Result<SignInResult, AuthError> {
    let Some((login, password)) = parse_credentials(body) else {
        state.flood.record(ip);
        return Err(AuthError::Validation(
            "login and password are required".to_string(),
        ));
    };

    let password_hash = hash_password(password, &state.config.salt);
    let user = state
        .users
        .find_by_login_and_password(login, &password_hash)
        .await?;

    let Some(mut user) = user else {
        state.flood.record(ip);
        return Err(AuthError::Authentication);
    };

    let (access_tokens, refresh_token) = state.issuer.issue(&user).await?;
    user.redact_password();

    Ok(SignInResult {
        user,
        access_tokens,
        refresh_token,
    })
}

fn parse_credentials(body: &Value) -> Option<(&str, &str)> {
    let login = body.get("login")?.as_str()?.trim();
    let password = body.get("password")?.as_str()?;
    if login.is_empty() || password.is_empty() {
        return None;
    }
    Some((login, password))
}

/// Salted SHA-256 digest matching the hash stored in the user collection.
pub(crate) fn hash_password(password: &str, salt: &str) -> String {
    format!("{:x}", Sha256::digest(format!("{password}{salt}")))
}

/// Response of a successful sign-in or refresh call
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub(crate) struct SignInResult {
    /// The authenticated user with credentials redacted
    pub user: User,
    /// Deduplicated bearer tokens, one per authorized role instance
    pub access_tokens: Vec<AccessToken>,
    /// Long-lived token for the refresh flow
    pub refresh_token: RefreshToken,
}
