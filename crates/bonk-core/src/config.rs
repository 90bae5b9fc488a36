//! Configuration types for bonkpad

use serde::{Deserialize, Serialize};

/// Ledger service connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Ledger service base URL (e.g., "https://api.bonk.fun")
    pub base_url: String,

    /// Session bearer token for authenticated endpoints (optional)
    #[serde(default)]
    pub auth_token: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8787".to_string(),
            auth_token: String::new(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ledger service connection settings
    pub ledger: LedgerConfig,

    /// Local API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Deposit-detection poll interval in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Deposit-detection attempt ceiling before the timeout fires
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

fn default_api_port() -> u16 {
    8917
}

fn default_poll_interval_secs() -> u64 {
    15
}

fn default_max_poll_attempts() -> u32 {
    40
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            api_port: default_api_port(),
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}
