//! Cancellable fixed-interval polling
//!
//! A poll loop has exactly four exits, decided within the cycle that
//! observes them: the probe succeeds, the probe fails, the stop flag is set,
//! or the attempt ceiling is reached. A successful cycle never schedules
//! another poll, and the ceiling cannot fire twice because the loop returns.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bonk_core::LedgerError;

/// Poll cadence and ceiling
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

/// Terminal outcome of a poll loop
#[derive(Debug)]
pub enum PollEnd<T> {
    /// The probe reported success
    Success(T),
    /// The probe returned an error
    Failed(LedgerError),
    /// Attempt ceiling reached without success
    TimedOut,
    /// Cooperative stop requested
    Stopped,
}

/// Run `probe` every `interval` until a terminal condition.
///
/// The probe receives the 1-based attempt number and reports
/// `Ok(Some(value))` on success, `Ok(None)` to keep polling, or `Err` to end
/// the loop. The stop flag is checked before each attempt, so a stop
/// requested mid-sleep takes effect before the next probe.
pub async fn poll_until<T, F, Fut>(
    config: PollConfig,
    stop: Arc<AtomicBool>,
    mut probe: F,
) -> PollEnd<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, LedgerError>>,
{
    let mut attempts = 0u32;

    loop {
        if stop.load(Ordering::SeqCst) {
            return PollEnd::Stopped;
        }

        attempts += 1;
        match probe(attempts).await {
            Ok(Some(value)) => return PollEnd::Success(value),
            Ok(None) => {}
            Err(e) => return PollEnd::Failed(e),
        }

        if attempts >= config.max_attempts {
            return PollEnd::TimedOut;
        }

        tokio::time::sleep(config.interval).await;
    }
}
