//! Core domain + application logic for the GitHub → Telegram relay.
//!
//! This crate is intentionally framework-agnostic. The HTTP surface and the
//! Telegram Bot API live behind adapter crates; everything here is pure or
//! testable against the messaging port with a stub.

pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod format;
pub mod logging;
pub mod messaging;
pub mod resolve;
pub mod signature;
pub mod token;

pub use errors::{Error, Result};
