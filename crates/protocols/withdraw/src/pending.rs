//! Pending-operations reconciliation
//!
//! Decides, from the user's outstanding withdrawal requests, whether a new
//! withdrawal may start or an existing one must be resolved first. At most
//! one request may be non-terminal at a time; these helpers are how the
//! client enforces that rule before opening the entry form.

use bonk_core::{WithdrawalRequest, WithdrawalStatus};
use serde::Serialize;

/// Count of requests still in a non-terminal status. Order independent.
pub fn pending_count(requests: &[WithdrawalRequest]) -> usize {
    requests.iter().filter(|r| r.is_pending()).count()
}

/// Where the "start withdraw" action should land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryRoute {
    /// No pending requests; show the new-withdrawal entry form
    NewWithdrawal,
    /// Outstanding requests exist; show them first
    PendingList,
}

/// Route the withdraw entry point based on outstanding requests.
pub fn entry_route(requests: &[WithdrawalRequest]) -> EntryRoute {
    if pending_count(requests) > 0 {
        EntryRoute::PendingList
    } else {
        EntryRoute::NewWithdrawal
    }
}

/// One row of the pending-withdrawals view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItem {
    pub request: WithdrawalRequest,
    /// Continue into the confirm step (fee payment attestation)
    pub can_continue: bool,
    /// Cancel-and-refund is still possible
    pub can_cancel: bool,
    /// Failed and the reserved amount came back automatically
    pub auto_refunded: bool,
    /// Service-supplied failure reason, if any
    pub failure_reason: Option<String>,
}

/// Build the pending view: completed requests are excluded entirely,
/// `awaiting_fee_payment` rows are actionable, `processing` rows are
/// read-only (irreversible from the client's perspective), and failed rows
/// carry their failure annotations.
pub fn pending_view(requests: &[WithdrawalRequest]) -> Vec<PendingItem> {
    requests
        .iter()
        .filter(|r| r.status != WithdrawalStatus::Completed)
        .map(|r| {
            let actionable = r.status == WithdrawalStatus::AwaitingFeePayment;
            let metadata = r.metadata.as_ref();
            PendingItem {
                can_continue: actionable,
                can_cancel: actionable,
                auto_refunded: r.status == WithdrawalStatus::Failed
                    && metadata.is_some_and(|m| m.auto_refunded),
                failure_reason: if r.status == WithdrawalStatus::Failed {
                    metadata.and_then(|m| m.failure_reason.clone())
                } else {
                    None
                },
                request: r.clone(),
            }
        })
        .collect()
}
