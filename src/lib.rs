//! KOL Signal Relay
//!
//! Parses trading calls posted in chat communities into structured
//! signals, scores them, and relays each one exactly once.

pub mod config;
pub mod error;
pub mod filter;
pub mod ingester;
pub mod notify;
pub mod parser;
pub mod quality;
pub mod relay;
pub mod storage;
pub mod types;

#[cfg(test)]
mod error_tests;

pub use error::{RelayError, Result};
pub use types::*;
