//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, FixedOffset};

/// JST is UTC+9
const JST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
///
/// Unix time does not depend on the offset, so this is the same instant
/// regardless of the zone it is later rendered in.
pub fn get_jst_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to JST RFC 3339 format
///
/// Timestamps outside chrono's representable range are rendered as the raw
/// millisecond value.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let Some(jst_offset) = FixedOffset::east_opt(JST_OFFSET_SECONDS) else {
        return timestamp_millis.to_string();
    };

    DateTime::from_timestamp_millis(timestamp_millis).map_or_else(
        || timestamp_millis.to_string(),
        |dt| dt.with_timezone(&jst_offset).to_rfc3339(),
    )
}
