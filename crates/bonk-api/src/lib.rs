//! bonk-api: HTTP API layer for bonkpad
//!
//! Provides a RESTful API for the frontend to drive the withdrawal and
//! power-down flows, plus the session context and deposit polling.

pub mod deposit_watcher;
pub mod dto;
pub mod poller;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::{ApiStateError, AppState, SessionState};
