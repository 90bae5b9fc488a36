//! Background deposit watcher
//!
//! Polls the ledger for an increase of the spendable balance over the
//! baseline captured at watch start, so the frontend can confirm an inbound
//! transfer without the user refreshing. One watch at a time; a watch ends on
//! detection, explicit stop, probe error, or the attempt ceiling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bonk_core::BonkAmount;
use ledger_client::{Ledger, LedgerClient};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::poller::{poll_until, PollConfig, PollEnd};

/// Terminal/active state of a deposit watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    Watching,
    Detected,
    Error,
    Timeout,
    Stopped,
}

/// Snapshot of the current (or last finished) watch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchSnapshot {
    pub id: String,
    pub state: WatchState,
    pub attempts: u32,
    /// Spendable balance when the watch started
    pub baseline: BonkAmount,
    /// Delta over the baseline once detected
    pub detected_amount: Option<BonkAmount>,
    pub error: Option<String>,
}

struct WatcherInner {
    snapshot: Option<WatchSnapshot>,
    stop: Option<Arc<AtomicBool>>,
}

/// Manages the single deposit watch for the session
pub struct DepositWatcher {
    inner: Arc<Mutex<WatcherInner>>,
}

impl DepositWatcher {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(WatcherInner {
                snapshot: None,
                stop: None,
            })),
        }
    }

    /// Snapshot of the current or last watch
    pub async fn status(&self) -> Option<WatchSnapshot> {
        self.inner.lock().await.snapshot.clone()
    }

    /// Start watching for a deposit. Returns the watch id; if a watch is
    /// already running its id is returned instead of starting another.
    pub async fn start(
        &self,
        ledger: LedgerClient,
        interval: Duration,
        max_attempts: u32,
    ) -> Result<WatchSnapshot, bonk_core::LedgerError> {
        let mut inner = self.inner.lock().await;

        if let Some(snapshot) = &inner.snapshot {
            if snapshot.state == WatchState::Watching {
                return Ok(snapshot.clone());
            }
        }

        // Baseline is captured up front; detection compares against it, not
        // against the previous poll, so a deposit split across two polls
        // still resolves once the total clears the baseline.
        let baseline = ledger.get_balance().await?.spendable;

        let snapshot = WatchSnapshot {
            id: uuid::Uuid::new_v4().to_string(),
            state: WatchState::Watching,
            attempts: 0,
            baseline,
            detected_amount: None,
            error: None,
        };
        let stop = Arc::new(AtomicBool::new(false));

        inner.snapshot = Some(snapshot.clone());
        inner.stop = Some(stop.clone());
        drop(inner);

        tracing::info!(watch_id = %snapshot.id, baseline, "Deposit watch started");

        let shared = self.inner.clone();
        let config = PollConfig {
            interval,
            max_attempts,
        };

        tokio::spawn(async move {
            let probe_shared = shared.clone();
            let end = poll_until(config, stop, move |attempt| {
                let ledger = ledger.clone();
                let shared = probe_shared.clone();
                async move {
                    if let Some(snapshot) = shared.lock().await.snapshot.as_mut() {
                        snapshot.attempts = attempt;
                    }
                    let balance = ledger.get_balance().await?;
                    if balance.spendable > baseline {
                        Ok(Some(balance.spendable - baseline))
                    } else {
                        Ok(None)
                    }
                }
            })
            .await;

            let mut inner = shared.lock().await;
            inner.stop = None;
            if let Some(snapshot) = inner.snapshot.as_mut() {
                match end {
                    PollEnd::Success(delta) => {
                        tracing::info!(watch_id = %snapshot.id, delta, "Deposit detected");
                        snapshot.state = WatchState::Detected;
                        snapshot.detected_amount = Some(delta);
                    }
                    PollEnd::Failed(e) => {
                        tracing::warn!(watch_id = %snapshot.id, error = %e, "Deposit watch failed");
                        snapshot.state = WatchState::Error;
                        snapshot.error = Some(e.to_string());
                    }
                    PollEnd::TimedOut => {
                        tracing::info!(watch_id = %snapshot.id, "Deposit watch timed out");
                        snapshot.state = WatchState::Timeout;
                    }
                    PollEnd::Stopped => {
                        snapshot.state = WatchState::Stopped;
                    }
                }
            }
        });

        Ok(snapshot)
    }

    /// Request a cooperative stop of the running watch, if any.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(stop) = inner.stop.take() {
            stop.store(true, Ordering::SeqCst);
            if let Some(snapshot) = inner.snapshot.as_mut() {
                if snapshot.state == WatchState::Watching {
                    snapshot.state = WatchState::Stopped;
                }
            }
            tracing::debug!("Deposit watch stop requested");
        }
    }
}

impl Default for DepositWatcher {
    fn default() -> Self {
        Self::new()
    }
}
