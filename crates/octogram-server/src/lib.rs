//! HTTP surface of the relay (axum).
//!
//! Four endpoints: the GitHub webhook receiver, the Telegram bot-update
//! receiver, a status page and a one-shot webhook registration helper.

pub mod handlers;
pub mod routes;

pub use routes::{app, run, AppState};
