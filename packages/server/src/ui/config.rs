//! Server configuration.

use std::str::FromStr;

use axum::http::HeaderValue;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

/// Allowed cross-origin policy: `*` allows every origin, anything else is an exact origin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsOrigin {
    #[default]
    Any,
    Exact(HeaderValue),
}

impl CorsOrigin {
    /// Whether a request carrying the given `Origin` header may connect.
    ///
    /// Non-browser clients send no `Origin` header and are always allowed.
    pub fn allows(&self, origin: Option<&HeaderValue>) -> bool {
        match (self, origin) {
            (Self::Any, _) | (Self::Exact(_), None) => true,
            (Self::Exact(allowed), Some(origin)) => allowed == origin,
        }
    }
}

impl FromStr for CorsOrigin {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value == "*" {
            return Ok(Self::Any);
        }
        if value.is_empty() {
            return Err(ConfigError::InvalidCorsOrigin(value.to_string()));
        }
        HeaderValue::from_str(value)
            .map(Self::Exact)
            .map_err(|_| ConfigError::InvalidCorsOrigin(value.to_string()))
    }
}

/// Process-level settings passed through from the command line / environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g., "0.0.0.0")
    pub host: String,
    /// The port number to bind to (e.g., 8080)
    pub port: u16,
    pub cors_origin: CorsOrigin,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
