//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room as exposed by `GET /api/rooms` and `GET /api/rooms/{code}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub code: String,
    pub host: String,
    pub guest: Option<String>,
    /// RFC 3339 (JST)
    pub created_at: String,
}
