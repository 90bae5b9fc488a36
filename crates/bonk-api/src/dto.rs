//! Data Transfer Objects for API requests and responses

use bonk_core::{format_amount, Balance, BonkAmount, PowerDownStatus, WithdrawalRequest};
use powerdown::{CancelOutcome, PowerDownPreview, PowerUpPreview, WeekEntry};
use serde::{Deserialize, Serialize};
use withdraw::{CloseDisposition, EntryRoute, PendingItem, WithdrawStep};

/// Decimal places for whole-token balance displays
const BALANCE_DECIMALS: u32 = 0;

/// Decimal places for per-period and fee amounts, which can be sub-1
const FRACTIONAL_DECIMALS: u32 = 4;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn not_authenticated() -> Self {
        Self::new("not_authenticated", "No active session")
    }
}

/// Session login request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLoginRequest {
    pub handle: String,
    pub token: String,
}

/// Session status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub handle: Option<String>,
}

/// Balance response with pre-formatted display strings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub spendable: f64,
    pub influence: f64,
    pub spendable_display: String,
    pub influence_display: String,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            spendable: balance.spendable,
            influence: balance.influence,
            spendable_display: format_amount(balance.spendable, BALANCE_DECIMALS),
            influence_display: format_amount(balance.influence, BALANCE_DECIMALS),
        }
    }
}

/// Current withdrawal flow state exposed to the frontend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawFlowResponse {
    pub step: WithdrawStep,
    pub withdrawal: Option<WithdrawalRequest>,
    pub close_disposition: CloseDisposition,
    /// Last service error, verbatim
    pub error: Option<String>,
}

/// New withdrawal submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequestBody {
    pub amount: BonkAmount,
    pub destination_address: String,
}

/// Fee payment attestation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawConfirmBody {
    pub fee_payment_tx_hash: String,
}

/// Resume a specific pending withdrawal
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResumeBody {
    pub withdrawal_id: String,
}

/// Cancel-and-refund result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawCancelResponse {
    pub refunded_amount: BonkAmount,
    pub refunded_display: String,
}

impl WithdrawCancelResponse {
    pub fn new(refunded_amount: BonkAmount) -> Self {
        Self {
            refunded_amount,
            refunded_display: format_amount(refunded_amount, BALANCE_DECIMALS),
        }
    }
}

/// Outstanding withdrawals and where the entry point should route
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWithdrawalsResponse {
    pub pending_count: usize,
    pub route: EntryRoute,
    pub items: Vec<PendingItem>,
}

/// Active power-down with its derived schedule
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDownStatusResponse {
    pub active: bool,
    pub status: Option<PowerDownStatus>,
    pub schedule: Vec<WeekEntry>,
    pub progress_pct: f64,
    pub bonk_remaining: BonkAmount,
    pub weekly_display: Option<String>,
}

impl PowerDownStatusResponse {
    /// No active power-down
    pub fn inactive() -> Self {
        Self {
            active: false,
            status: None,
            schedule: Vec::new(),
            progress_pct: 0.0,
            bonk_remaining: 0.0,
            weekly_display: None,
        }
    }

    pub fn from_status(status: PowerDownStatus) -> Self {
        Self {
            active: !status.is_complete(),
            schedule: powerdown::compute_schedule(&status),
            progress_pct: powerdown::progress_pct(&status),
            bonk_remaining: powerdown::bonk_remaining(&status),
            weekly_display: Some(format_amount(
                status.weekly_bonk_amount,
                FRACTIONAL_DECIMALS,
            )),
            status: Some(status),
        }
    }
}

/// Amount input for previews and power-down start
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountBody {
    pub amount: f64,
}

/// Power-down preview; `preview` is absent for invalid input rather than an
/// error, matching the form behavior of simply not rendering figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDownPreviewResponse {
    pub valid: bool,
    pub preview: Option<PowerDownPreview>,
    pub weekly_display: Option<String>,
}

impl PowerDownPreviewResponse {
    pub fn new(preview: Option<PowerDownPreview>) -> Self {
        Self {
            valid: preview.is_some(),
            weekly_display: preview.map(|p| format_amount(p.weekly_bonk, FRACTIONAL_DECIMALS)),
            preview,
        }
    }
}

/// Power-up preview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpPreviewResponse {
    pub valid: bool,
    pub preview: Option<PowerUpPreview>,
}

impl PowerUpPreviewResponse {
    pub fn new(preview: Option<PowerUpPreview>) -> Self {
        Self {
            valid: preview.is_some(),
            preview,
        }
    }
}

/// Acknowledgement gate for power-down cancellation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDownCancelBody {
    /// Must be true; the consequences preview must be shown first
    #[serde(default)]
    pub acknowledged: bool,
}

/// Result of a power-down cancellation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDownCancelResponse {
    pub outcome: CancelOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_response_display_strings() {
        let response = BalanceResponse::from(Balance {
            spendable: 1_500_000.0,
            influence: 2_300.0,
        });
        assert_eq!(response.spendable_display, "1.5M");
        assert_eq!(response.influence_display, "2.3K");
    }

    #[test]
    fn test_preview_response_suppression() {
        let response = PowerDownPreviewResponse::new(None);
        assert!(!response.valid);
        assert!(response.preview.is_none());
        assert!(response.weekly_display.is_none());
    }

    #[test]
    fn test_cancel_body_defaults_to_unacknowledged() {
        let body: PowerDownCancelBody = serde_json::from_str("{}").unwrap();
        assert!(!body.acknowledged);
    }
}
