//! BONK⇄dBONK conversion previews
//!
//! Deterministic functions of form input and current balances. Invalid input
//! suppresses the preview (`None`) rather than raising an error — the entry
//! form simply shows nothing until the amount is usable. All figures are
//! previews; the backend recomputes them authoritatively on submission.

use bonk_core::constants::{BONK_TO_DBONK_RATE, POWER_DOWN_WEEKS, WEEK_SECS};
use bonk_core::{BonkAmount, DbonkAmount, PowerDownStatus, Timestamp};
use serde::Serialize;

use crate::schedule::dbonk_remaining;

/// Preview of a prospective (not-yet-submitted) power-down
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDownPreview {
    /// BONK released over the full schedule
    pub total_bonk: BonkAmount,
    /// BONK released per period
    pub weekly_bonk: BonkAmount,
    /// Projected completion (epoch seconds)
    pub completion_date: Timestamp,
}

/// Preview a power-down of `amount` dBONK.
///
/// Valid iff `0 < amount ≤ influence_balance`.
pub fn power_down_preview(
    amount: DbonkAmount,
    influence_balance: DbonkAmount,
    now: Timestamp,
) -> Option<PowerDownPreview> {
    if !amount.is_finite() || amount <= 0.0 || amount > influence_balance {
        return None;
    }

    let total_bonk = amount / BONK_TO_DBONK_RATE;
    Some(PowerDownPreview {
        total_bonk,
        weekly_bonk: total_bonk / POWER_DOWN_WEEKS as f64,
        completion_date: now + POWER_DOWN_WEEKS as Timestamp * WEEK_SECS,
    })
}

/// Preview of a prospective power-up (BONK → dBONK)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpPreview {
    pub influence_received: DbonkAmount,
    pub new_influence_total: DbonkAmount,
}

/// Preview a power-up of `amount` BONK.
///
/// Valid iff `0 < amount ≤ spendable_balance`.
pub fn power_up_preview(
    amount: BonkAmount,
    spendable_balance: BonkAmount,
    current_influence: DbonkAmount,
) -> Option<PowerUpPreview> {
    if !amount.is_finite() || amount <= 0.0 || amount > spendable_balance {
        return None;
    }

    let influence_received = amount * BONK_TO_DBONK_RATE;
    Some(PowerUpPreview {
        influence_received,
        new_influence_total: current_influence + influence_received,
    })
}

/// What cancelling an active power-down does to the user's balances
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOutcome {
    /// Locked dBONK returned to the unlocked influence balance
    pub dbonk_returned: DbonkAmount,
    /// BONK already released; stays with the user
    pub bonk_kept: BonkAmount,
    /// Periods that had already unlocked
    pub weeks_completed: u32,
}

/// Consequences of cancelling `status` right now.
///
/// Already-distributed BONK is non-recoverable by the platform; the
/// unconverted remainder goes back to ordinary influence instead of being
/// forfeited.
pub fn cancel_outcome(status: &PowerDownStatus) -> CancelOutcome {
    CancelOutcome {
        dbonk_returned: dbonk_remaining(status),
        bonk_kept: status.bonk_distributed,
        weeks_completed: status.weeks_completed,
    }
}
