//! Local input validation for the withdrawal flow
//!
//! These checks run before any network call; failures here short-circuit
//! without touching the flow's service-error slot. Format checks are basic
//! (length proxies) — the ledger service performs full validation.

use bonk_core::constants::{MIN_DESTINATION_LEN, MIN_FEE_TX_HASH_LEN, MIN_WITHDRAWAL};
use bonk_core::{BonkAmount, FlowError};

/// Validate the withdrawal amount against the minimum and the available
/// spendable balance. Exactly the minimum and exactly the balance are valid.
pub fn validate_withdrawal_input(
    amount: BonkAmount,
    available: BonkAmount,
) -> Result<(), FlowError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FlowError::InvalidAmount {
            message: "Amount must be a positive number".to_string(),
        });
    }

    if amount < MIN_WITHDRAWAL {
        return Err(FlowError::BelowMinimum {
            amount,
            minimum: MIN_WITHDRAWAL,
        });
    }

    if amount > available {
        return Err(FlowError::InsufficientBalance {
            requested: amount,
            available,
        });
    }

    Ok(())
}

/// Validate a payout destination address.
///
/// Non-empty and at least 32 characters — a loose proxy for a valid Base58
/// address, not cryptographic validation.
pub fn validate_destination(address: &str) -> Result<(), FlowError> {
    if address.is_empty() {
        return Err(FlowError::InvalidAddress {
            reason: "Address cannot be empty".to_string(),
        });
    }

    if address.len() < MIN_DESTINATION_LEN {
        return Err(FlowError::InvalidAddress {
            reason: format!(
                "Address too short ({} chars, minimum {})",
                address.len(),
                MIN_DESTINATION_LEN
            ),
        });
    }

    Ok(())
}

/// Validate a fee-payment transaction hash attestation.
///
/// At least 64 characters — a loose proxy for a valid transaction signature.
pub fn validate_fee_tx_hash(hash: &str) -> Result<(), FlowError> {
    if hash.len() < MIN_FEE_TX_HASH_LEN {
        return Err(FlowError::InvalidTxHash {
            reason: format!(
                "Transaction hash too short ({} chars, minimum {})",
                hash.len(),
                MIN_FEE_TX_HASH_LEN
            ),
        });
    }

    Ok(())
}
