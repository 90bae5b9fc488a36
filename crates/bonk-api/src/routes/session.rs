//! Session lifecycle endpoints
//!
//! The session is the explicit context object for everything else: login
//! hydrates the ledger client with the platform token, logout tears down all
//! session-scoped state.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dto::{SessionLoginRequest, SessionStatusResponse};
use crate::routes::{state_error, ErrorResponse};
use crate::AppState;

/// Create session routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/status", get(status))
}

/// POST /session/login - Establish a session
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<SessionLoginRequest>,
) -> Result<Json<SessionStatusResponse>, ErrorResponse> {
    state
        .login(request.handle, request.token)
        .await
        .map_err(|e| state_error(&e))?;

    status(State(state)).await
}

/// POST /session/logout - Tear down the session
pub async fn logout(
    State(state): State<AppState>,
) -> Result<Json<SessionStatusResponse>, ErrorResponse> {
    state.logout().await;
    status(State(state)).await
}

/// GET /session/status - Current session
pub async fn status(
    State(state): State<AppState>,
) -> Result<Json<SessionStatusResponse>, ErrorResponse> {
    let session = state.session().await;
    Ok(Json(SessionStatusResponse {
        authenticated: session.is_some(),
        handle: session.map(|s| s.handle),
    }))
}
