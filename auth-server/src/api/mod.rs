pub(crate) mod check;
pub(crate) mod health;
pub(crate) mod refresh;
pub(crate) mod sign_in;
pub(crate) mod verify_otp;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

/// Combines all API routes into a single router
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/check", post(check::check_handler))
        .route("/sign_in", post(sign_in::sign_in_handler))
        .route("/refresh", post(refresh::refresh_handler))
        .route("/verify_otp", post(verify_otp::verify_otp_handler))
        .route("/healthy", get(health::health_handler))
}
