//! bonkpad application entry point
//!
//! Serves the local wallet API the frontend talks to. The ledger service
//! location comes from the environment; the session token arrives later via
//! the login endpoint.

use anyhow::Context;
use bonk_api::AppState;
use bonk_core::AppConfig;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bonkpad=debug".parse().unwrap())
                .add_directive("bonk_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .init();
}

fn config_from_env() -> AppConfig {
    let mut config = AppConfig::default();

    if let Ok(url) = std::env::var("BONKPAD_LEDGER_URL") {
        config.ledger.base_url = url;
    }

    if let Ok(port) = std::env::var("BONKPAD_API_PORT") {
        match port.parse() {
            Ok(port) => config.api_port = port,
            Err(_) => tracing::warn!(%port, "Ignoring invalid BONKPAD_API_PORT"),
        }
    }

    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    tracing::info!("Starting bonkpad");

    let config = config_from_env();
    let port = config.api_port;
    let state = AppState::with_config(config);

    bonk_api::start_server(state, port)
        .await
        .context("API server failed")?;

    Ok(())
}
