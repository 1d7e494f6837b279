//! Sliding-window rate governor.
//!
//! Each caller identity owns a queue of admission timestamps covering the
//! trailing window. Timestamps older than the window are pruned before
//! every decision, so quota frees up continuously rather than on fixed
//! boundaries.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lyrion_core::constants::{DEFAULT_MAX_REQUESTS_PER_MINUTE, RATE_WINDOW_SECS};
use lyrion_core::types::RateLimitStatus;

/// Rate governor configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Admissions allowed per identity within one window
    pub max_requests_per_minute: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_minute: DEFAULT_MAX_REQUESTS_PER_MINUTE,
        }
    }
}

/// Per-identity sliding-window admission control.
///
/// Windows are created lazily on first use and never removed except by
/// [`RateGovernor::reset`]; pruning keeps each one bounded by the limit.
/// The map's entry lock makes prune-check-append atomic per identity.
#[derive(Debug)]
pub struct RateGovernor {
    windows: DashMap<String, VecDeque<DateTime<Utc>>>,
    limit: usize,
    window: Duration,
}

impl RateGovernor {
    /// Creates a governor with default configuration.
    pub fn new() -> Self {
        Self::with_config(RateLimitConfig::default())
    }

    /// Creates a governor with custom configuration.
    pub fn with_config(config: RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            limit: config.max_requests_per_minute,
            window: Duration::seconds(RATE_WINDOW_SECS),
        }
    }

    /// Admits or rejects one request for `identity` now.
    pub fn admit(&self, identity: &str) -> bool {
        self.admit_at(identity, Utc::now())
    }

    /// Admits or rejects one request for `identity` at `now`.
    ///
    /// On rejection the window is left as pruned; the rejected request is
    /// not recorded.
    pub fn admit_at(&self, identity: &str, now: DateTime<Utc>) -> bool {
        let mut timestamps = self.windows.entry(identity.to_string()).or_default();

        while timestamps
            .front()
            .is_some_and(|oldest| now - *oldest >= self.window)
        {
            timestamps.pop_front();
        }

        if timestamps.len() >= self.limit {
            debug!(identity, used = timestamps.len(), limit = self.limit, "Rate limit reached");
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Reports quota usage for `identity` now.
    pub fn status(&self, identity: &str) -> RateLimitStatus {
        self.status_at(identity, Utc::now())
    }

    /// Reports quota usage for `identity` at `now` without mutating state.
    ///
    /// `reset_time` is when the oldest retained timestamp leaves the
    /// window, or `now` if nothing is retained. An identity with no window
    /// yet reports a full window ahead.
    pub fn status_at(&self, identity: &str, now: DateTime<Utc>) -> RateLimitStatus {
        let Some(timestamps) = self.windows.get(identity) else {
            return RateLimitStatus {
                requests_made: 0,
                requests_remaining: self.limit,
                reset_time: now + self.window,
                limit: self.limit,
            };
        };

        let recent: Vec<DateTime<Utc>> = timestamps
            .iter()
            .filter(|t| now - **t < self.window)
            .copied()
            .collect();
        drop(timestamps);

        let reset_time = recent
            .iter()
            .min()
            .map(|oldest| *oldest + self.window)
            .unwrap_or(now);

        RateLimitStatus {
            requests_made: recent.len(),
            requests_remaining: self.limit.saturating_sub(recent.len()),
            reset_time,
            limit: self.limit,
        }
    }

    /// Forgets all history of `identity`.
    pub fn reset(&self, identity: &str) {
        self.windows.remove(identity);
    }
}

impl Default for RateGovernor {
    fn default() -> Self {
        Self::new()
    }
}
