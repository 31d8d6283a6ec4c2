//! MarketGap Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod remote;
/// Application state management
///
/// Holds the shared request context and agent id persistence.
pub mod state;
pub mod status;
