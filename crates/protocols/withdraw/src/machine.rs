//! Withdrawal flow state machine
//!
//! The visible step is derived, not stored: a locally created request, an
//! externally resumed one, and the session's own linear progress all feed
//! [`derive_step`]. Mutating actions take `&mut self`, so a second mutation
//! cannot start while one is in flight for the same request.

use bonk_core::{
    BonkAmount, Error, FlowError, WalletAddress, WithdrawalRequest, WithdrawalStatus,
};
use ledger_client::Ledger;
use serde::Serialize;

use crate::validate::{validate_destination, validate_fee_tx_hash, validate_withdrawal_input};

/// The three client-visible steps of a withdrawal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawStep {
    /// Amount and destination entry
    #[default]
    Enter,
    /// Fee payment and tx-hash attestation
    Confirm,
    /// Backend is finishing asynchronously; terminal for the client
    Processing,
}

/// What closing the flow mid-way should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseDisposition {
    /// Nothing pending locally; close silently
    Plain,
    /// A withdrawal created this session is awaiting fee payment: prompt,
    /// then cancel-and-refund before resetting
    ConfirmCancelAndRefund,
    /// Only an externally resumed request is active; leaving the screen
    /// keeps it pending for next time
    LeavePending,
}

/// Derive the visible step from the three sources of truth.
///
/// `internal` is the session's own linear progress (`enter` until a request
/// succeeds, `confirm` after it, `processing` after a confirm). An external
/// pending request lands the flow in `confirm` without passing through
/// `enter`.
pub fn derive_step(
    has_local: bool,
    has_external_pending: bool,
    internal: WithdrawStep,
) -> WithdrawStep {
    if internal == WithdrawStep::Processing {
        return WithdrawStep::Processing;
    }
    if has_local || has_external_pending {
        return WithdrawStep::Confirm;
    }
    WithdrawStep::Enter
}

/// Client-side state machine for one withdrawal lifecycle.
///
/// Holds at most one locally created request (this session) and at most one
/// externally resumed request; the local one always takes precedence.
#[derive(Debug, Default)]
pub struct WithdrawFlow {
    /// Request created by this session's `request` call
    local: Option<WithdrawalRequest>,
    /// Externally supplied pending request (resume-after-reload)
    resumed: Option<WithdrawalRequest>,
    /// Linear progress within this session
    internal: WithdrawStep,
    /// Last service error, verbatim; cleared on the next attempt.
    /// Validation failures never land here.
    last_error: Option<String>,
}

impl WithdrawFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible step
    pub fn step(&self) -> WithdrawStep {
        derive_step(self.local.is_some(), self.resumed.is_some(), self.internal)
    }

    /// The active withdrawal, if any. A locally created request wins over a
    /// resumed one.
    pub fn active(&self) -> Option<&WithdrawalRequest> {
        self.local.as_ref().or(self.resumed.as_ref())
    }

    /// Last service error message, verbatim from the ledger
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Adopt an externally pending request (e.g. after page reload), landing
    /// the flow directly in `confirm`. Only `awaiting_fee_payment` requests
    /// can be resumed.
    pub fn resume(&mut self, request: WithdrawalRequest) -> Result<(), FlowError> {
        if request.status != WithdrawalStatus::AwaitingFeePayment {
            return Err(FlowError::ActionNotAllowed {
                reason: format!(
                    "Cannot resume a withdrawal in status {}",
                    request.status
                ),
            });
        }

        tracing::debug!(withdrawal_id = %request.withdrawal_id, "Resuming pending withdrawal");
        self.resumed = Some(request);
        Ok(())
    }

    /// Submit a new withdrawal request.
    ///
    /// Validation failures short-circuit locally. On service success the flow
    /// stores the returned request and advances to `confirm`; on service
    /// failure it stays in `enter` with the message surfaced verbatim.
    pub async fn request<L: Ledger>(
        &mut self,
        ledger: &L,
        amount: BonkAmount,
        destination: &str,
        available: BonkAmount,
    ) -> Result<WithdrawalRequest, Error> {
        if self.active().is_some() {
            return Err(FlowError::WithdrawalAlreadyPending.into());
        }

        validate_withdrawal_input(amount, available)?;
        validate_destination(destination)?;

        self.last_error = None;
        let destination = WalletAddress::new(destination);

        match ledger.request_withdraw(amount, &destination).await {
            Ok(request) => {
                tracing::info!(
                    withdrawal_id = %request.withdrawal_id,
                    amount,
                    "Withdrawal requested"
                );
                self.local = Some(request.clone());
                self.internal = WithdrawStep::Confirm;
                Ok(request)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Attest the fee payment for the active request.
    ///
    /// On success the flow advances to `processing` unconditionally; the
    /// backend finishes (or fails) the payout asynchronously from here.
    pub async fn confirm<L: Ledger>(
        &mut self,
        ledger: &L,
        fee_payment_tx_hash: &str,
    ) -> Result<(), Error> {
        let active = self.active().ok_or(FlowError::NoActiveWithdrawal)?;
        if active.status != WithdrawalStatus::AwaitingFeePayment {
            return Err(FlowError::ActionNotAllowed {
                reason: format!("Withdrawal is {}", active.status),
            }
            .into());
        }

        validate_fee_tx_hash(fee_payment_tx_hash)?;

        let id = active.withdrawal_id.clone();
        self.last_error = None;

        match ledger.confirm_withdraw(&id, fee_payment_tx_hash).await {
            Ok(()) => {
                tracing::info!(withdrawal_id = %id, "Fee payment confirmed");
                self.internal = WithdrawStep::Processing;
                if let Some(req) = self.local.as_mut().or(self.resumed.as_mut()) {
                    req.status = WithdrawalStatus::Processing;
                }
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Cancel-and-refund the active request.
    ///
    /// On success all flow state resets and the refunded amount is returned.
    /// On failure the prior state is kept fully intact — the refund may not
    /// have happened.
    pub async fn cancel<L: Ledger>(&mut self, ledger: &L) -> Result<BonkAmount, Error> {
        let active = self.active().ok_or(FlowError::NoActiveWithdrawal)?;
        if active.status != WithdrawalStatus::AwaitingFeePayment {
            return Err(FlowError::ActionNotAllowed {
                reason: "Only a withdrawal awaiting fee payment can be cancelled".to_string(),
            }
            .into());
        }

        let id = active.withdrawal_id.clone();
        self.last_error = None;

        match ledger.cancel_withdraw(&id).await {
            Ok(receipt) => {
                tracing::info!(
                    withdrawal_id = %id,
                    refunded = receipt.refunded_amount,
                    "Withdrawal cancelled"
                );
                self.reset();
                Ok(receipt.refunded_amount)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// How closing the flow right now should behave.
    ///
    /// A locally created request still awaiting fee payment gets the
    /// destructive prompt; an externally resumed one is just left pending.
    pub fn close_disposition(&self) -> CloseDisposition {
        if self.step() != WithdrawStep::Confirm {
            return CloseDisposition::Plain;
        }
        if self.local.is_some() {
            CloseDisposition::ConfirmCancelAndRefund
        } else {
            CloseDisposition::LeavePending
        }
    }

    /// Clear all flow state back to `enter`.
    pub fn reset(&mut self) {
        self.local = None;
        self.resumed = None;
        self.internal = WithdrawStep::Enter;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonk_core::{LedgerError, WithdrawalId, WithdrawalStatus};
    use ledger_client::CancelReceipt;
    use std::sync::Mutex;

    /// 44-character destination, the typical Base58 address length
    fn dest44() -> String {
        format!("Dest{}", "1".repeat(40))
    }

    fn awaiting_request(id: &str, amount: f64) -> WithdrawalRequest {
        WithdrawalRequest {
            withdrawal_id: WithdrawalId::new(id),
            amount,
            destination_address: WalletAddress::new(
                "So1anaDest1nation111111111111111111111111111",
            ),
            estimated_fee: 0.002,
            fee_payment_address: WalletAddress::new("F33AddrPayHere111111111111111111111111111111"),
            status: WithdrawalStatus::AwaitingFeePayment,
            created_at: 1_700_000_000,
            metadata: None,
        }
    }

    /// In-memory ledger double recording calls and returning canned results
    #[derive(Default)]
    struct MockLedger {
        request_error: Option<String>,
        confirm_error: Option<String>,
        cancel_error: Option<String>,
        refund_amount: f64,
        confirm_calls: Mutex<Vec<(String, String)>>,
        cancel_calls: Mutex<Vec<String>>,
    }

    impl Ledger for MockLedger {
        async fn request_withdraw(
            &self,
            amount: f64,
            destination: &WalletAddress,
        ) -> Result<WithdrawalRequest, LedgerError> {
            if let Some(message) = &self.request_error {
                return Err(LedgerError::Api {
                    message: message.clone(),
                });
            }
            let mut request = awaiting_request("w1", amount);
            request.destination_address = destination.clone();
            Ok(request)
        }

        async fn confirm_withdraw(
            &self,
            id: &WithdrawalId,
            fee_payment_tx_hash: &str,
        ) -> Result<(), LedgerError> {
            self.confirm_calls
                .lock()
                .unwrap()
                .push((id.to_string(), fee_payment_tx_hash.to_string()));
            if let Some(message) = &self.confirm_error {
                return Err(LedgerError::Api {
                    message: message.clone(),
                });
            }
            Ok(())
        }

        async fn cancel_withdraw(&self, id: &WithdrawalId) -> Result<CancelReceipt, LedgerError> {
            self.cancel_calls.lock().unwrap().push(id.to_string());
            if let Some(message) = &self.cancel_error {
                return Err(LedgerError::Api {
                    message: message.clone(),
                });
            }
            Ok(CancelReceipt {
                refunded_amount: self.refund_amount,
            })
        }

        async fn list_withdraw_requests(&self) -> Result<Vec<WithdrawalRequest>, LedgerError> {
            Ok(Vec::new())
        }

        async fn start_power_down(
            &self,
            _dbonk_amount: f64,
        ) -> Result<bonk_core::PowerDownStatus, LedgerError> {
            unimplemented!("not used by withdrawal tests")
        }

        async fn cancel_power_down(&self) -> Result<(), LedgerError> {
            unimplemented!("not used by withdrawal tests")
        }

        async fn get_power_down_status(
            &self,
        ) -> Result<Option<bonk_core::PowerDownStatus>, LedgerError> {
            Ok(None)
        }

        async fn get_balance(&self) -> Result<bonk_core::Balance, LedgerError> {
            Ok(bonk_core::Balance::default())
        }
    }

    #[test]
    fn test_derive_step_table() {
        use WithdrawStep::*;

        // Fresh session, nothing pending anywhere.
        assert_eq!(derive_step(false, false, Enter), Enter);
        // Locally created request this session.
        assert_eq!(derive_step(true, false, Confirm), Confirm);
        // Externally resumed request, no local progress.
        assert_eq!(derive_step(false, true, Enter), Confirm);
        // Confirm happened this session, local or resumed.
        assert_eq!(derive_step(true, false, Processing), Processing);
        assert_eq!(derive_step(false, true, Processing), Processing);
    }

    #[tokio::test]
    async fn test_request_advances_to_confirm() {
        // Scenario: balance 500, withdraw 100 to a 44-char address.
        let ledger = MockLedger::default();
        let mut flow = WithdrawFlow::new();
        let destination = dest44();
        assert_eq!(destination.len(), 44);

        let request = flow
            .request(&ledger, 100.0, &destination, 500.0)
            .await
            .unwrap();

        assert_eq!(flow.step(), WithdrawStep::Confirm);
        assert_eq!(request.withdrawal_id.as_str(), "w1");
        assert_eq!(request.amount, 100.0);
        assert_eq!(request.estimated_fee, 0.002);
        assert_eq!(flow.active().unwrap(), &request);
        assert!(flow.last_error().is_none());
    }

    #[tokio::test]
    async fn test_validation_short_circuits_without_network_call() {
        let ledger = MockLedger::default();
        let mut flow = WithdrawFlow::new();
        let err = flow.request(&ledger, 99.0, &dest44(), 500.0).await;
        assert!(matches!(
            err,
            Err(Error::Flow(FlowError::BelowMinimum { .. }))
        ));
        // Validation failures never occupy the service-error slot.
        assert!(flow.last_error().is_none());
        assert_eq!(flow.step(), WithdrawStep::Enter);
    }

    #[tokio::test]
    async fn test_service_error_surfaced_verbatim() {
        let ledger = MockLedger {
            request_error: Some("Destination address is blacklisted".to_string()),
            ..Default::default()
        };
        let mut flow = WithdrawFlow::new();
        let err = flow.request(&ledger, 100.0, &dest44(), 500.0).await;
        assert!(err.is_err());
        assert_eq!(
            flow.last_error(),
            Some("Destination address is blacklisted")
        );
        // Stays in enter; no silent reset.
        assert_eq!(flow.step(), WithdrawStep::Enter);
    }

    #[tokio::test]
    async fn test_confirm_advances_to_processing() {
        let ledger = MockLedger::default();
        let mut flow = WithdrawFlow::new();
        flow.request(&ledger, 100.0, &dest44(), 500.0)
            .await
            .unwrap();

        let hash = "s".repeat(80);
        flow.confirm(&ledger, &hash).await.unwrap();

        assert_eq!(flow.step(), WithdrawStep::Processing);
        assert_eq!(
            flow.active().unwrap().status,
            WithdrawalStatus::Processing
        );

        let calls = ledger.confirm_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("w1".to_string(), hash));
    }

    #[tokio::test]
    async fn test_short_hash_rejected_before_network_call() {
        let ledger = MockLedger::default();
        let mut flow = WithdrawFlow::new();
        flow.resume(awaiting_request("w2", 150.0)).unwrap();

        let err = flow.confirm(&ledger, &"x".repeat(63)).await;
        assert!(matches!(
            err,
            Err(Error::Flow(FlowError::InvalidTxHash { .. }))
        ));
        assert!(ledger.confirm_calls.lock().unwrap().is_empty());
        assert_eq!(flow.step(), WithdrawStep::Confirm);
    }

    #[tokio::test]
    async fn test_resumption_lands_in_confirm() {
        let mut flow = WithdrawFlow::new();
        let external = awaiting_request("w7", 250.0);

        flow.resume(external.clone()).unwrap();

        assert_eq!(flow.step(), WithdrawStep::Confirm);
        assert_eq!(flow.active(), Some(&external));
        assert_eq!(flow.close_disposition(), CloseDisposition::LeavePending);
    }

    #[tokio::test]
    async fn test_resume_rejects_processing_request() {
        let mut flow = WithdrawFlow::new();
        let mut external = awaiting_request("w7", 250.0);
        external.status = WithdrawalStatus::Processing;

        assert!(flow.resume(external).is_err());
        assert_eq!(flow.step(), WithdrawStep::Enter);
    }

    #[tokio::test]
    async fn test_request_refused_while_pending_active() {
        let ledger = MockLedger::default();
        let mut flow = WithdrawFlow::new();
        flow.resume(awaiting_request("w-old", 300.0)).unwrap();

        // The machine refuses a second request while one is active.
        flow.request(&ledger, 100.0, &dest44(), 500.0)
            .await
            .expect_err("already pending");
        assert_eq!(flow.active().unwrap().withdrawal_id.as_str(), "w-old");
    }

    #[tokio::test]
    async fn test_local_request_wins_over_resumed() {
        let ledger = MockLedger::default();
        let mut flow = WithdrawFlow::new();
        flow.request(&ledger, 100.0, &dest44(), 500.0)
            .await
            .unwrap();

        // A stale pending-list refresh handing in an external request must
        // not displace the withdrawal created this session.
        flow.resume(awaiting_request("w-old", 300.0)).unwrap();

        assert_eq!(flow.active().unwrap().withdrawal_id.as_str(), "w1");
        assert_eq!(
            flow.close_disposition(),
            CloseDisposition::ConfirmCancelAndRefund
        );
    }

    #[tokio::test]
    async fn test_cancel_resets_flow() {
        let ledger = MockLedger {
            refund_amount: 100.0,
            ..Default::default()
        };
        let mut flow = WithdrawFlow::new();
        flow.request(&ledger, 100.0, &dest44(), 500.0)
            .await
            .unwrap();
        assert_eq!(
            flow.close_disposition(),
            CloseDisposition::ConfirmCancelAndRefund
        );

        let refunded = flow.cancel(&ledger).await.unwrap();

        assert_eq!(refunded, 100.0);
        assert_eq!(flow.step(), WithdrawStep::Enter);
        assert!(flow.active().is_none());
        assert_eq!(ledger.cancel_calls.lock().unwrap().as_slice(), ["w1"]);
    }

    #[tokio::test]
    async fn test_cancel_failure_keeps_state_intact() {
        let ledger = MockLedger {
            cancel_error: Some("refund queue unavailable".to_string()),
            ..Default::default()
        };
        let mut flow = WithdrawFlow::new();
        let request = flow
            .request(&ledger, 100.0, &dest44(), 500.0)
            .await
            .unwrap();

        let err = flow.cancel(&ledger).await;
        assert!(err.is_err());

        // The refund may not have happened: nothing is cleared.
        assert_eq!(flow.step(), WithdrawStep::Confirm);
        assert_eq!(flow.active(), Some(&request));
        assert_eq!(flow.last_error(), Some("refund queue unavailable"));
    }

    #[tokio::test]
    async fn test_cancel_not_allowed_after_confirm() {
        let ledger = MockLedger::default();
        let mut flow = WithdrawFlow::new();
        flow.request(&ledger, 100.0, &dest44(), 500.0)
            .await
            .unwrap();
        flow.confirm(&ledger, &"s".repeat(64)).await.unwrap();

        let err = flow.cancel(&ledger).await;
        assert!(matches!(
            err,
            Err(Error::Flow(FlowError::ActionNotAllowed { .. }))
        ));
        assert!(ledger.cancel_calls.lock().unwrap().is_empty());
    }
}
