//! # Lyrion request governance
//!
//! Process-wide state every operation passes through:
//!
//! - [`ResponseCache`]: key → serialized result with lazy TTL expiry
//! - [`cache_key`]: deterministic keys over a closed set of prefixes
//! - [`RateGovernor`]: sliding 60-second admission window per caller identity

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod key;
mod rate_limit;

pub use cache::{CacheConfig, CacheStats, ResponseCache};
pub use key::{cache_key, normalize_key_arg, CachePrefix};
pub use rate_limit::{RateGovernor, RateLimitConfig};
