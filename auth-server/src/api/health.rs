use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use crate::store::DocumentStore;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

/// Liveness plus a cheap store round-trip: a no-match read against the user
/// collection proves the backend is reachable.
#[utoipa::path(
    get,
    path = "/healthy",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Server is up and the store is reachable"),
        (status = 503, description = "Document store is unreachable")
    )
)]
pub(super) async fn health_handler(State(state): State<AppState>) -> Response {
    let probe = json!({"internal_id": {"$lt": 0}});
    match state
        .store
        .read(&state.config.storage.collections.users, &probe)
        .await
    {
        Ok(_) => (StatusCode::OK, Json(json!({"status": "ok"}))).into_response(),
        Err(err) => {
            log::error!("Health probe failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable"})),
            )
                .into_response()
        }
    }
}
