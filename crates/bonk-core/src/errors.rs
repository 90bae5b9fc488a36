//! Error types for bonkpad

use thiserror::Error;

/// Core errors that can occur in bonkpad
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Ledger service connection and request errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger service unreachable at {url}")]
    Unreachable { url: String },

    /// The service rejected the call; `message` is surfaced verbatim to the user
    #[error("{message}")]
    Api { message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Withdrawal request not found: {withdrawal_id}")]
    RequestNotFound { withdrawal_id: String },

    #[error("Not authenticated")]
    Unauthenticated,
}

/// Withdrawal / power-down flow errors.
///
/// Validation variants short-circuit before any network call; they never
/// occupy the flow's service-error slot.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Minimum withdrawal is {minimum} BONK")]
    BelowMinimum { amount: f64, minimum: f64 },

    #[error("Insufficient balance: need {requested}, have {available}")]
    InsufficientBalance { requested: f64, available: f64 },

    #[error("Invalid destination address: {reason}")]
    InvalidAddress { reason: String },

    #[error("Invalid fee payment transaction hash: {reason}")]
    InvalidTxHash { reason: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("No active withdrawal")]
    NoActiveWithdrawal,

    #[error("Action not allowed: {reason}")]
    ActionNotAllowed { reason: String },

    #[error("A withdrawal is already pending; resolve it first")]
    WithdrawalAlreadyPending,
}

/// Result type alias for bonkpad operations
pub type Result<T> = std::result::Result<T, Error>;

impl FlowError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BelowMinimum { .. } => "below_minimum",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::InvalidAddress { .. } => "invalid_address",
            Self::InvalidTxHash { .. } => "invalid_tx_hash",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::NoActiveWithdrawal => "no_active_withdrawal",
            Self::ActionNotAllowed { .. } => "action_not_allowed",
            Self::WithdrawalAlreadyPending => "withdrawal_already_pending",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BelowMinimum { .. } | Self::InvalidAmount { .. } => 400,
            Self::InvalidAddress { .. } | Self::InvalidTxHash { .. } => 400,
            Self::InsufficientBalance { .. } => 422,
            Self::ActionNotAllowed { .. } | Self::WithdrawalAlreadyPending => 422,
            Self::NoActiveWithdrawal => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_error_codes() {
        let err = FlowError::BelowMinimum {
            amount: 50.0,
            minimum: 100.0,
        };
        assert_eq!(err.error_code(), "below_minimum");
        assert_eq!(err.status_code(), 400);

        let err = FlowError::InsufficientBalance {
            requested: 600.0,
            available: 500.0,
        };
        assert_eq!(err.error_code(), "insufficient_balance");
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_api_error_message_is_verbatim() {
        let err = LedgerError::Api {
            message: "withdrawal w1 already confirmed".to_string(),
        };
        // The Display impl must carry exactly the service message, nothing
        // prepended, so the UI can show it as-is.
        assert_eq!(err.to_string(), "withdrawal w1 already confirmed");
    }
}
