//! Withdrawal Flow Implementation
//!
//! Drives a BONK withdrawal through its lifecycle: amount/destination entry,
//! out-of-band network-fee payment with tx-hash attestation, then backend
//! processing. Supports resuming an externally pending request after reload
//! and enforces the at-most-one-pending rule via the reconciliation helpers.

pub mod machine;
pub mod pending;
pub mod validate;

pub use machine::{derive_step, CloseDisposition, WithdrawFlow, WithdrawStep};
pub use pending::{entry_route, pending_count, pending_view, EntryRoute, PendingItem};
pub use validate::{validate_destination, validate_fee_tx_hash, validate_withdrawal_input};
