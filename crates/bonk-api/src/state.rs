//! Application state shared across API handlers
//!
//! The session context is explicit: login hydrates the ledger client with the
//! session token, logout tears everything down (session, flow state, caches,
//! deposit watch). Balance and withdrawal-list reads go through caches that
//! are invalidated — never patched — after a successful mutation, because the
//! amounts involve settlement the client cannot fully observe.

use std::sync::Arc;
use std::time::Instant;

use bonk_core::{AppConfig, Balance, LedgerConfig, LedgerError, WithdrawalRequest};
use ledger_client::{Ledger, LedgerClient};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use withdraw::WithdrawFlow;

use crate::deposit_watcher::DepositWatcher;

/// Errors that can occur in the API layer
#[derive(Debug, Error)]
pub enum ApiStateError {
    /// Login input rejected before touching the ledger
    #[error("Invalid session: {reason}")]
    InvalidSession { reason: String },

    /// Ledger client could not be constructed or called
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// State representing an authenticated platform session.
#[derive(Clone, Debug)]
pub struct SessionState {
    /// The user's platform handle
    pub handle: String,
    /// When the session was established
    pub connected_at: Instant,
}

impl SessionState {
    pub fn new(handle: String) -> Self {
        Self {
            handle,
            connected_at: Instant::now(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
    ledger: RwLock<Option<LedgerClient>>,
    session: RwLock<Option<SessionState>>,
    withdraw: Mutex<WithdrawFlow>,
    balance_cache: RwLock<Option<Balance>>,
    withdrawals_cache: RwLock<Option<Vec<WithdrawalRequest>>>,
    deposit_watcher: DepositWatcher,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                ledger: RwLock::new(None),
                session: RwLock::new(None),
                withdraw: Mutex::new(WithdrawFlow::new()),
                balance_cache: RwLock::new(None),
                withdrawals_cache: RwLock::new(None),
                deposit_watcher: DepositWatcher::new(),
            }),
        }
    }

    /// Get the current application config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Get the ledger client, if a session is established
    pub async fn ledger(&self) -> Option<LedgerClient> {
        self.inner.ledger.read().await.clone()
    }

    /// Get the current session, if any
    pub async fn session(&self) -> Option<SessionState> {
        self.inner.session.read().await.clone()
    }

    /// The withdrawal flow for this session. Callers lock it for the full
    /// duration of a mutating action, which serializes mutations per flow.
    pub fn withdraw_flow(&self) -> &Mutex<WithdrawFlow> {
        &self.inner.withdraw
    }

    /// The deposit-detection watcher
    pub fn deposit_watcher(&self) -> &DepositWatcher {
        &self.inner.deposit_watcher
    }

    /// Establish a session: hydrate the ledger client with the bearer token
    /// and reset any state left over from a previous session.
    pub async fn login(&self, handle: String, token: String) -> Result<(), ApiStateError> {
        if handle.is_empty() {
            return Err(ApiStateError::InvalidSession {
                reason: "Handle cannot be empty".to_string(),
            });
        }
        if token.is_empty() {
            return Err(ApiStateError::InvalidSession {
                reason: "Session token cannot be empty".to_string(),
            });
        }

        let base_url = self.inner.config.read().await.ledger.base_url.clone();
        let client = LedgerClient::new(LedgerConfig {
            base_url,
            auth_token: token,
        })?;

        tracing::info!(handle = %handle, "Session established");

        *self.inner.ledger.write().await = Some(client);
        *self.inner.session.write().await = Some(SessionState::new(handle));
        self.inner.withdraw.lock().await.reset();
        self.invalidate_wallet_caches().await;
        Ok(())
    }

    /// Tear down the session: clears the ledger client, flow state, caches,
    /// and stops any deposit watch.
    pub async fn logout(&self) {
        tracing::info!("Session closed");
        self.inner.deposit_watcher.stop().await;
        *self.inner.session.write().await = None;
        *self.inner.ledger.write().await = None;
        self.inner.withdraw.lock().await.reset();
        self.invalidate_wallet_caches().await;
    }

    /// Drop the cached balance and withdrawal list so the next read
    /// re-fetches the authoritative source.
    pub async fn invalidate_wallet_caches(&self) {
        *self.inner.balance_cache.write().await = None;
        *self.inner.withdrawals_cache.write().await = None;
    }

    /// Current balances, served from cache when warm.
    pub async fn balance(&self) -> Result<Balance, ApiStateError> {
        if let Some(balance) = *self.inner.balance_cache.read().await {
            return Ok(balance);
        }

        let ledger = self.ledger().await.ok_or(LedgerError::Unauthenticated)?;
        let balance = ledger.get_balance().await?;
        *self.inner.balance_cache.write().await = Some(balance);
        Ok(balance)
    }

    /// The user's withdrawal requests, served from cache when warm.
    pub async fn withdrawals(&self) -> Result<Vec<WithdrawalRequest>, ApiStateError> {
        if let Some(requests) = self.inner.withdrawals_cache.read().await.clone() {
            return Ok(requests);
        }

        let ledger = self.ledger().await.ok_or(LedgerError::Unauthenticated)?;
        let requests = ledger.list_withdraw_requests().await?;
        *self.inner.withdrawals_cache.write().await = Some(requests.clone());
        Ok(requests)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
