//! Power-down and power-up endpoints

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bonk_core::{FlowError, Timestamp};
use ledger_client::Ledger;
use powerdown::{cancel_outcome, power_down_preview, power_up_preview};

use crate::dto::{
    AmountBody, ApiError, PowerDownCancelBody, PowerDownCancelResponse, PowerDownPreviewResponse,
    PowerDownStatusResponse, PowerUpPreviewResponse,
};
use crate::routes::{flow_error, ledger_error, not_authenticated, state_error, ErrorResponse};
use crate::AppState;

/// Create power-down routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/preview", post(preview))
        .route("/start", post(start))
        .route("/cancel/preview", get(cancel_preview))
        .route("/cancel", post(cancel))
}

/// Create power-up routes
pub fn powerup_router() -> Router<AppState> {
    Router::new().route("/preview", post(powerup_preview))
}

fn now_ts() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as Timestamp
}

/// GET /powerdown/status - Active power-down with derived schedule
pub async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<PowerDownStatusResponse>, ErrorResponse> {
    let ledger = state.ledger().await.ok_or_else(not_authenticated)?;

    let status = ledger
        .get_power_down_status()
        .await
        .map_err(|e| ledger_error(&e))?;

    Ok(Json(match status {
        Some(status) => PowerDownStatusResponse::from_status(status),
        None => PowerDownStatusResponse::inactive(),
    }))
}

/// POST /powerdown/preview - Preview a prospective power-down
pub async fn preview(
    State(state): State<AppState>,
    Json(body): Json<AmountBody>,
) -> Result<Json<PowerDownPreviewResponse>, ErrorResponse> {
    let balance = state.balance().await.map_err(|e| state_error(&e))?;
    let preview = power_down_preview(body.amount, balance.influence, now_ts());
    Ok(Json(PowerDownPreviewResponse::new(preview)))
}

/// POST /powerup/preview - Preview a prospective power-up
pub async fn powerup_preview(
    State(state): State<AppState>,
    Json(body): Json<AmountBody>,
) -> Result<Json<PowerUpPreviewResponse>, ErrorResponse> {
    let balance = state.balance().await.map_err(|e| state_error(&e))?;
    let preview = power_up_preview(body.amount, balance.spendable, balance.influence);
    Ok(Json(PowerUpPreviewResponse::new(preview)))
}

/// POST /powerdown/start - Begin a power-down
pub async fn start(
    State(state): State<AppState>,
    Json(body): Json<AmountBody>,
) -> Result<Json<PowerDownStatusResponse>, ErrorResponse> {
    let ledger = state.ledger().await.ok_or_else(not_authenticated)?;
    let balance = state.balance().await.map_err(|e| state_error(&e))?;

    // Same validity rule as the preview: positive and within the influence
    // balance.
    if power_down_preview(body.amount, balance.influence, now_ts()).is_none() {
        return Err(flow_error(&FlowError::InvalidAmount {
            message: format!(
                "Power-down amount must be positive and at most {} dBONK",
                balance.influence
            ),
        }));
    }

    let status = ledger
        .start_power_down(body.amount)
        .await
        .map_err(|e| ledger_error(&e))?;

    state.invalidate_wallet_caches().await;
    Ok(Json(PowerDownStatusResponse::from_status(status)))
}

/// GET /powerdown/cancel/preview - Consequences of cancelling now
pub async fn cancel_preview(
    State(state): State<AppState>,
) -> Result<Json<PowerDownCancelResponse>, ErrorResponse> {
    let ledger = state.ledger().await.ok_or_else(not_authenticated)?;

    let status = ledger
        .get_power_down_status()
        .await
        .map_err(|e| ledger_error(&e))?
        .ok_or_else(no_active_power_down)?;

    Ok(Json(PowerDownCancelResponse {
        outcome: cancel_outcome(&status),
    }))
}

/// POST /powerdown/cancel - Cancel the active power-down
///
/// Requires `acknowledged: true`; the frontend must show the consequences
/// preview first. Cancellation is irreversible once submitted.
pub async fn cancel(
    State(state): State<AppState>,
    Json(body): Json<PowerDownCancelBody>,
) -> Result<Json<PowerDownCancelResponse>, ErrorResponse> {
    if !body.acknowledged {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "cancel_not_acknowledged",
                "Cancellation requires acknowledging the consequences first",
            )),
        ));
    }

    let ledger = state.ledger().await.ok_or_else(not_authenticated)?;

    let status = ledger
        .get_power_down_status()
        .await
        .map_err(|e| ledger_error(&e))?
        .ok_or_else(no_active_power_down)?;
    let outcome = cancel_outcome(&status);

    ledger
        .cancel_power_down()
        .await
        .map_err(|e| ledger_error(&e))?;

    state.invalidate_wallet_caches().await;
    Ok(Json(PowerDownCancelResponse { outcome }))
}

fn no_active_power_down() -> ErrorResponse {
    (
        StatusCode::CONFLICT,
        Json(ApiError::new(
            "no_active_power_down",
            "No power-down is currently active",
        )),
    )
}
