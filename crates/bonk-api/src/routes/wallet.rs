//! Balance and deposit-watch endpoints

use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::deposit_watcher::WatchSnapshot;
use crate::dto::BalanceResponse;
use crate::routes::{ledger_error, not_authenticated, state_error, ErrorResponse};
use crate::AppState;

/// Create wallet routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/balance", get(get_balance))
        .route(
            "/deposit/watch",
            post(start_deposit_watch)
                .get(deposit_watch_status)
                .delete(stop_deposit_watch),
        )
}

/// GET /wallet/balance - Current balances (cached until invalidated)
pub async fn get_balance(
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, ErrorResponse> {
    let balance = state.balance().await.map_err(|e| state_error(&e))?;
    Ok(Json(BalanceResponse::from(balance)))
}

/// POST /wallet/deposit/watch - Start polling for an inbound deposit
pub async fn start_deposit_watch(
    State(state): State<AppState>,
) -> Result<Json<WatchSnapshot>, ErrorResponse> {
    let ledger = state.ledger().await.ok_or_else(not_authenticated)?;
    let config = state.config().await;

    let snapshot = state
        .deposit_watcher()
        .start(
            ledger,
            Duration::from_secs(config.poll_interval_secs),
            config.max_poll_attempts,
        )
        .await
        .map_err(|e| ledger_error(&e))?;

    Ok(Json(snapshot))
}

/// GET /wallet/deposit/watch - Current or last watch state
pub async fn deposit_watch_status(
    State(state): State<AppState>,
) -> Json<Option<WatchSnapshot>> {
    Json(state.deposit_watcher().status().await)
}

/// DELETE /wallet/deposit/watch - Cooperatively stop the running watch
pub async fn stop_deposit_watch(State(state): State<AppState>) -> StatusCode {
    state.deposit_watcher().stop().await;
    StatusCode::NO_CONTENT
}
