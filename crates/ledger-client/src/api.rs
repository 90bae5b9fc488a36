//! The ledger service operation contract.
//!
//! Request/response shapes only — transport detail lives in the concrete
//! [`LedgerClient`](crate::LedgerClient). Flows take the ledger by generic
//! parameter so tests can substitute an in-memory implementation.

use std::future::Future;

use bonk_core::{
    Balance, BonkAmount, DbonkAmount, LedgerError, PowerDownStatus, WalletAddress, WithdrawalId,
    WithdrawalRequest,
};
use serde::{Deserialize, Serialize};

/// Refund receipt returned when a pending withdrawal is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelReceipt {
    /// BONK released back to the spendable balance
    pub refunded_amount: BonkAmount,
}

/// Operations the remote ledger/balance service exposes to this client.
pub trait Ledger {
    /// Submit a withdrawal intent. The service reserves `amount` and returns
    /// the request in `awaiting_fee_payment`.
    fn request_withdraw(
        &self,
        amount: BonkAmount,
        destination: &WalletAddress,
    ) -> impl Future<Output = Result<WithdrawalRequest, LedgerError>> + Send;

    /// Attest the network-fee payment; the service validates it on-chain and
    /// moves the request to `processing`.
    fn confirm_withdraw(
        &self,
        id: &WithdrawalId,
        fee_payment_tx_hash: &str,
    ) -> impl Future<Output = Result<(), LedgerError>> + Send;

    /// Cancel-and-refund; only valid while `awaiting_fee_payment`.
    fn cancel_withdraw(
        &self,
        id: &WithdrawalId,
    ) -> impl Future<Output = Result<CancelReceipt, LedgerError>> + Send;

    /// All of the user's withdrawal requests, newest first.
    fn list_withdraw_requests(
        &self,
    ) -> impl Future<Output = Result<Vec<WithdrawalRequest>, LedgerError>> + Send;

    /// Begin a power-down for `dbonk_amount` of the influence balance.
    fn start_power_down(
        &self,
        dbonk_amount: DbonkAmount,
    ) -> impl Future<Output = Result<PowerDownStatus, LedgerError>> + Send;

    /// Stop the active power-down; remaining locked dBONK returns to the
    /// unlocked influence balance.
    fn cancel_power_down(&self) -> impl Future<Output = Result<(), LedgerError>> + Send;

    /// The active power-down, if any.
    fn get_power_down_status(
        &self,
    ) -> impl Future<Output = Result<Option<PowerDownStatus>, LedgerError>> + Send;

    /// Current spendable/influence balances.
    fn get_balance(&self) -> impl Future<Output = Result<Balance, LedgerError>> + Send;
}
