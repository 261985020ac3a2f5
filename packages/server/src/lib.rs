//! Two-party game room relay library.
//!
//! A host creates a room keyed by its player id, a single guest joins it with
//! that id as the invitation code, and game actions are relayed verbatim
//! between the two over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
