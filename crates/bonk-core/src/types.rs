//! Core type definitions for bonkpad

use serde::{Deserialize, Serialize};
use std::fmt;

/// Withdrawal request ID (opaque, issued by the ledger service)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WithdrawalId(pub String);

impl WithdrawalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WithdrawalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External payout address (Base58-encoded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spendable token amount (BONK)
pub type BonkAmount = f64;

/// Influence amount (dBONK / Laugh Power)
pub type DbonkAmount = f64;

/// Network gas token amount (the fee-payment denomination)
pub type GasAmount = f64;

/// Epoch-seconds timestamp
pub type Timestamp = i64;

/// Lifecycle status of a withdrawal request.
///
/// `completed` and `failed` are terminal. A request leaves
/// `awaiting_fee_payment` only after the client attests the fee payment
/// (to `processing`) or cancels it (deleted server-side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    AwaitingFeePayment,
    Processing,
    Completed,
    Failed,
}

impl WithdrawalStatus {
    /// Non-terminal statuses count toward the at-most-one-pending rule.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::AwaitingFeePayment | Self::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingFeePayment => "awaiting_fee_payment",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extra fields the service attaches to failed requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalMetadata {
    /// The reserved amount was returned automatically on failure
    #[serde(default)]
    pub auto_refunded: bool,
    /// Service-supplied reason for the failure
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// A pending intent to move BONK from internal balance to an external address.
///
/// `amount`, `destination_address`, and `estimated_fee` are fixed at request
/// time by the ledger service and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub withdrawal_id: WithdrawalId,
    /// BONK amount reserved for this payout
    pub amount: BonkAmount,
    pub destination_address: WalletAddress,
    /// Gas-token fee the user must pay before processing starts
    pub estimated_fee: GasAmount,
    /// Where the network fee must be sent
    pub fee_payment_address: WalletAddress,
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub metadata: Option<WithdrawalMetadata>,
}

impl WithdrawalRequest {
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}

/// Snapshot of an active power-down returned by the ledger service.
///
/// The client never advances `weeks_completed` or the running totals itself,
/// it only reflects what the backend's unlock job reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDownStatus {
    /// Instant the power-down began (epoch seconds)
    pub start_date: Timestamp,
    /// dBONK committed to this power-down
    pub total_dbonk_amount: DbonkAmount,
    /// total_dbonk_amount / BONK_TO_DBONK_RATE
    pub total_bonk_equivalent: BonkAmount,
    /// total_bonk_equivalent / POWER_DOWN_WEEKS
    pub weekly_bonk_amount: BonkAmount,
    /// Periods already unlocked, in [0, POWER_DOWN_WEEKS]
    pub weeks_completed: u32,
    /// dBONK converted so far
    pub dbonk_converted: DbonkAmount,
    /// BONK released to the spendable balance so far
    pub bonk_distributed: BonkAmount,
    pub next_payout_date: Timestamp,
    pub estimated_completion: Timestamp,
}

impl PowerDownStatus {
    /// At week 8 the power-down is implicitly complete and no longer active.
    pub fn is_complete(&self) -> bool {
        self.weeks_completed >= constants::POWER_DOWN_WEEKS
    }
}

/// Spendable and influence balances for the session user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// BONK available for spending/withdrawal
    pub spendable: BonkAmount,
    /// dBONK (Laugh Power), non-transferable
    pub influence: DbonkAmount,
}

/// Constants
///
/// Conversion constants must match the backend exactly — every client-side
/// computation is a preview, never authoritative.
pub mod constants {
    use super::{BonkAmount, Timestamp};

    /// 1 BONK locked on Power Up yields this much dBONK
    pub const BONK_TO_DBONK_RATE: f64 = 15.0;

    /// Power-down release periods (weekly)
    pub const POWER_DOWN_WEEKS: u32 = 8;

    /// Minimum BONK withdrawable per request
    pub const MIN_WITHDRAWAL: BonkAmount = 100.0;

    /// Loose proxy for a valid Base58 payout address
    pub const MIN_DESTINATION_LEN: usize = 32;

    /// Loose proxy for a valid fee-payment transaction signature
    pub const MIN_FEE_TX_HASH_LEN: usize = 64;

    /// One release period in epoch seconds
    pub const WEEK_SECS: Timestamp = 7 * 86_400;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_pending_classification() {
        assert!(WithdrawalStatus::AwaitingFeePayment.is_pending());
        assert!(WithdrawalStatus::Processing.is_pending());
        assert!(!WithdrawalStatus::Completed.is_pending());
        assert!(!WithdrawalStatus::Failed.is_pending());

        assert!(WithdrawalStatus::Completed.is_terminal());
        assert!(WithdrawalStatus::Failed.is_terminal());
        assert!(!WithdrawalStatus::Processing.is_terminal());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&WithdrawalStatus::AwaitingFeePayment).unwrap();
        assert_eq!(json, "\"awaiting_fee_payment\"");

        let parsed: WithdrawalStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(parsed, WithdrawalStatus::Processing);
    }

    #[test]
    fn test_withdrawal_request_wire_format() {
        let json = r#"{
            "withdrawalId": "w1",
            "amount": 100.0,
            "destinationAddress": "So1anaDest1nation1111111111111111111111111111",
            "estimatedFee": 0.002,
            "feePaymentAddress": "F33AddrPayHere11111111111111111111111111111",
            "status": "awaiting_fee_payment",
            "createdAt": 1700000000
        }"#;

        let req: WithdrawalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.withdrawal_id.as_str(), "w1");
        assert_eq!(req.amount, 100.0);
        assert_eq!(req.estimated_fee, 0.002);
        assert_eq!(req.status, WithdrawalStatus::AwaitingFeePayment);
        assert!(req.metadata.is_none());
        assert!(req.is_pending());
    }

    #[test]
    fn test_failed_request_metadata() {
        let json = r#"{
            "withdrawalId": "w9",
            "amount": 250.0,
            "destinationAddress": "So1anaDest1nation1111111111111111111111111111",
            "estimatedFee": 0.002,
            "feePaymentAddress": "F33AddrPayHere11111111111111111111111111111",
            "status": "failed",
            "metadata": { "autoRefunded": true, "failureReason": "fee payment not found" }
        }"#;

        let req: WithdrawalRequest = serde_json::from_str(json).unwrap();
        let meta = req.metadata.unwrap();
        assert!(meta.auto_refunded);
        assert_eq!(meta.failure_reason.as_deref(), Some("fee payment not found"));
    }

    #[test]
    fn test_power_down_completion() {
        let status = PowerDownStatus {
            start_date: 1_700_000_000,
            total_dbonk_amount: 1200.0,
            total_bonk_equivalent: 80.0,
            weekly_bonk_amount: 10.0,
            weeks_completed: 8,
            dbonk_converted: 1200.0,
            bonk_distributed: 80.0,
            next_payout_date: 0,
            estimated_completion: 1_704_838_400,
        };
        assert!(status.is_complete());
    }
}
