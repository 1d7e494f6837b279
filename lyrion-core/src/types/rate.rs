//! Rate governor snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quota usage of one caller identity over the trailing window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Requests admitted within the window
    pub requests_made: usize,
    /// Requests still admissible within the window
    pub requests_remaining: usize,
    /// When the oldest admitted request leaves the window
    pub reset_time: DateTime<Utc>,
    /// Configured ceiling
    pub limit: usize,
}

impl RateLimitStatus {
    /// Returns true if no more requests would be admitted right now.
    pub fn is_exhausted(&self) -> bool {
        self.requests_remaining == 0
    }
}
