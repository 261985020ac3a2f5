//! Shared utilities for the Taikyoku game relay.
//!
//! - `logger`: tracing subscriber setup for binaries
//! - `time`: clock abstraction and timestamp formatting

pub mod logger;
pub mod time;
