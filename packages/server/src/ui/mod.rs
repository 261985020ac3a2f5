//! WebSocket game relay server implementation.

pub mod config;
mod handler;
mod server;
mod signal;
pub mod state;

pub use config::{ConfigError, CorsOrigin, ServerConfig};
pub use server::Server;
