//! Fixed values and configuration defaults for Lyrion.
//!
//! Every tunable here has an environment override in the service
//! configuration; the values below are what a bare environment gets.

// ═══════════════════════════════════════════════════════════════════════════════
// REMOTE ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the Genius REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.genius.com";

/// Base URL of the Genius website that hosts lyrics pages.
pub const DEFAULT_WEB_BASE_URL: &str = "https://genius.com";

/// Public URL prefix for a single annotation page.
pub const ANNOTATION_URL_BASE: &str = "https://genius.com/annotations";

/// User agent sent to the REST API.
pub const API_USER_AGENT: &str = concat!("Lyrion/", env!("CARGO_PKG_VERSION"));

/// Browser user agent sent when fetching lyrics pages.
pub const SCRAPING_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Accept header sent when fetching lyrics pages.
pub const SCRAPING_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Accept-Language header sent when fetching lyrics pages.
pub const SCRAPING_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK
// ═══════════════════════════════════════════════════════════════════════════════

/// Default timeout for every outbound request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

// ═══════════════════════════════════════════════════════════════════════════════
// GOVERNANCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Default cache time-to-live in seconds (one hour).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default number of admitted requests per identity per window.
pub const DEFAULT_MAX_REQUESTS_PER_MINUTE: usize = 30;

/// Length of the sliding rate-limit window in seconds.
pub const RATE_WINDOW_SECS: i64 = 60;

/// Identity used when the caller does not supply one.
/// Every such caller shares a single quota.
pub const DEFAULT_IDENTITY: &str = "default";

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT LIMITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length (in characters) of a song name, artist name or query.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 200;

/// Upper bound for the search `limit` parameter.
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 20;

/// Search `limit` used when the caller gives none.
pub const DEFAULT_SEARCH_LIMIT: i64 = 5;

/// Maximum number of ids in one batch annotation request.
pub const DEFAULT_MAX_ANNOTATION_IDS: usize = 50;

// ═══════════════════════════════════════════════════════════════════════════════
// LYRICS RENDERING
// ═══════════════════════════════════════════════════════════════════════════════

/// Title used when a lyrics page has no top-level heading.
pub const UNKNOWN_TITLE: &str = "Unknown Song";

/// Width of the `=` rule between title and lyrics body.
pub const TITLE_RULE_WIDTH: usize = 60;

/// Explanation used when an annotation has no (or a blank) body.
pub const NO_EXPLANATION: &str = "No explanation available";

/// Attribute marking a lyrics container element on a lyrics page.
pub const LYRICS_CONTAINER_ATTR: &str = "data-lyrics-container";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        assert_eq!(DEFAULT_CACHE_TTL_SECS, 3600);
        assert_eq!(DEFAULT_MAX_REQUESTS_PER_MINUTE, 30);
        assert_eq!(DEFAULT_MAX_INPUT_LENGTH, 200);
        assert_eq!(DEFAULT_MAX_SEARCH_RESULTS, 20);
        assert!((DEFAULT_TIMEOUT_SECS - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_search_limit_within_ceiling() {
        assert!(DEFAULT_SEARCH_LIMIT >= 1);
        assert!(DEFAULT_SEARCH_LIMIT as usize <= DEFAULT_MAX_SEARCH_RESULTS);
    }

    #[test]
    fn test_urls_have_no_trailing_slash() {
        for url in [DEFAULT_API_BASE_URL, DEFAULT_WEB_BASE_URL, ANNOTATION_URL_BASE] {
            assert!(!url.ends_with('/'), "{url} must not end with '/'");
        }
    }
}
