//! API route handlers

pub mod health;
pub mod powerdown;
pub mod session;
pub mod wallet;
pub mod withdraw;

use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use bonk_core::{Error, FlowError, LedgerError};

use crate::dto::ApiError;
use crate::state::ApiStateError;
use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/session", session::router())
        .nest("/wallet", wallet::router())
        .nest("/withdraw", withdraw::router())
        .nest("/powerdown", powerdown::router())
        .nest("/powerup", powerdown::powerup_router())
        .with_state(state)
}

pub(crate) type ErrorResponse = (StatusCode, Json<ApiError>);

pub(crate) fn not_authenticated() -> ErrorResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiError::not_authenticated()),
    )
}

pub(crate) fn flow_error(e: &FlowError) -> ErrorResponse {
    (
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_REQUEST),
        Json(ApiError::new(e.error_code(), e.to_string())),
    )
}

pub(crate) fn ledger_error(e: &LedgerError) -> ErrorResponse {
    match e {
        LedgerError::Unauthenticated => not_authenticated(),
        LedgerError::Unreachable { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("ledger_unreachable", e.to_string())),
        ),
        // Service messages pass through verbatim.
        LedgerError::Api { message } => (
            StatusCode::BAD_GATEWAY,
            Json(ApiError::new("ledger_error", message.clone())),
        ),
        LedgerError::RequestNotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("not_found", e.to_string())),
        ),
        LedgerError::Parse(_) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiError::new("ledger_error", e.to_string())),
        ),
    }
}

pub(crate) fn core_error(e: &Error) -> ErrorResponse {
    match e {
        Error::Flow(flow) => flow_error(flow),
        Error::Ledger(ledger) => ledger_error(ledger),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("internal_error", e.to_string())),
        ),
    }
}

pub(crate) fn state_error(e: &ApiStateError) -> ErrorResponse {
    match e {
        ApiStateError::InvalidSession { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(e.to_string())),
        ),
        ApiStateError::Ledger(ledger) => ledger_error(ledger),
    }
}
