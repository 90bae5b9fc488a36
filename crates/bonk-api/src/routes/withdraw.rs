//! Withdrawal flow endpoints
//!
//! Thin wrappers over the flow state machine. Every mutation that succeeds
//! invalidates the balance and withdrawal-list caches; the flow itself is
//! held under a mutex for the duration of each mutating call, so a second
//! mutation cannot start while one is pending for the same request.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bonk_core::FlowError;
use withdraw::{entry_route, pending_count, pending_view, WithdrawFlow};

use crate::dto::{
    ApiError, PendingWithdrawalsResponse, WithdrawCancelResponse, WithdrawConfirmBody,
    WithdrawFlowResponse, WithdrawRequestBody, WithdrawResumeBody,
};
use crate::routes::{core_error, flow_error, not_authenticated, state_error, ErrorResponse};
use crate::AppState;

/// Create withdrawal routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/flow", get(get_flow))
        .route("/request", post(request))
        .route("/confirm", post(confirm))
        .route("/cancel", post(cancel))
        .route("/resume", post(resume))
        .route("/pending", get(pending))
}

fn flow_response(flow: &WithdrawFlow) -> WithdrawFlowResponse {
    WithdrawFlowResponse {
        step: flow.step(),
        withdrawal: flow.active().cloned(),
        close_disposition: flow.close_disposition(),
        error: flow.last_error().map(str::to_string),
    }
}

/// GET /withdraw/flow - Current flow state
pub async fn get_flow(State(state): State<AppState>) -> Json<WithdrawFlowResponse> {
    let flow = state.withdraw_flow().lock().await;
    Json(flow_response(&flow))
}

/// POST /withdraw/request - Submit a new withdrawal
pub async fn request(
    State(state): State<AppState>,
    Json(body): Json<WithdrawRequestBody>,
) -> Result<Json<WithdrawFlowResponse>, ErrorResponse> {
    let ledger = state.ledger().await.ok_or_else(not_authenticated)?;

    // At most one non-terminal withdrawal per user: surface pending requests
    // instead of creating a second one.
    let outstanding = state.withdrawals().await.map_err(|e| state_error(&e))?;
    if pending_count(&outstanding) > 0 {
        return Err(flow_error(&FlowError::WithdrawalAlreadyPending));
    }

    let balance = state.balance().await.map_err(|e| state_error(&e))?;

    let mut flow = state.withdraw_flow().lock().await;
    let result = flow
        .request(&ledger, body.amount, &body.destination_address, balance.spendable)
        .await;
    let response = flow_response(&flow);
    drop(flow);

    match result {
        Ok(_) => {
            state.invalidate_wallet_caches().await;
            Ok(Json(response))
        }
        Err(e) => Err(core_error(&e)),
    }
}

/// POST /withdraw/confirm - Attest the fee payment
pub async fn confirm(
    State(state): State<AppState>,
    Json(body): Json<WithdrawConfirmBody>,
) -> Result<Json<WithdrawFlowResponse>, ErrorResponse> {
    let ledger = state.ledger().await.ok_or_else(not_authenticated)?;

    let mut flow = state.withdraw_flow().lock().await;
    let result = flow.confirm(&ledger, &body.fee_payment_tx_hash).await;
    let response = flow_response(&flow);
    drop(flow);

    match result {
        Ok(()) => {
            state.invalidate_wallet_caches().await;
            Ok(Json(response))
        }
        Err(e) => Err(core_error(&e)),
    }
}

/// POST /withdraw/cancel - Cancel-and-refund the active withdrawal
pub async fn cancel(
    State(state): State<AppState>,
) -> Result<Json<WithdrawCancelResponse>, ErrorResponse> {
    let ledger = state.ledger().await.ok_or_else(not_authenticated)?;

    let mut flow = state.withdraw_flow().lock().await;
    let result = flow.cancel(&ledger).await;
    drop(flow);

    match result {
        Ok(refunded) => {
            state.invalidate_wallet_caches().await;
            Ok(Json(WithdrawCancelResponse::new(refunded)))
        }
        Err(e) => Err(core_error(&e)),
    }
}

/// POST /withdraw/resume - Adopt a pending withdrawal as the active one
pub async fn resume(
    State(state): State<AppState>,
    Json(body): Json<WithdrawResumeBody>,
) -> Result<Json<WithdrawFlowResponse>, ErrorResponse> {
    let outstanding = state.withdrawals().await.map_err(|e| state_error(&e))?;

    let target = outstanding
        .into_iter()
        .find(|r| r.withdrawal_id.as_str() == body.withdrawal_id)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiError::new(
                    "not_found",
                    format!("Withdrawal request not found: {}", body.withdrawal_id),
                )),
            )
        })?;

    let mut flow = state.withdraw_flow().lock().await;
    flow.resume(target).map_err(|e| flow_error(&e))?;
    Ok(Json(flow_response(&flow)))
}

/// GET /withdraw/pending - Outstanding requests and entry routing
pub async fn pending(
    State(state): State<AppState>,
) -> Result<Json<PendingWithdrawalsResponse>, ErrorResponse> {
    let requests = state.withdrawals().await.map_err(|e| state_error(&e))?;

    Ok(Json(PendingWithdrawalsResponse {
        pending_count: pending_count(&requests),
        route: entry_route(&requests),
        items: pending_view(&requests),
    }))
}
