//! Error types for Lyrion.
//!
//! Every failure in the workspace, whether it comes from a scraped page,
//! the remote API or caller input, is one variant of [`LyrionError`].
//! Each variant belongs to exactly one [`ErrorCategory`], which is what
//! callers see in the response envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RateLimitStatus;

/// Result type alias using `LyrionError`.
pub type Result<T> = std::result::Result<T, LyrionError>;

/// Main error type for all Lyrion operations.
#[derive(Debug, Error)]
pub enum LyrionError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Caller input is malformed.
    #[error("{0}")]
    ValidationError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // RATE LIMIT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// The local rate governor refused admission.
    #[error("Maximum {} requests per minute allowed", .0.limit)]
    RateLimitExceeded(RateLimitStatus),

    // ═══════════════════════════════════════════════════════════════════════════
    // SCRAPING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// The lyrics page does not exist.
    #[error("Song not found at URL: {url}")]
    SongNotFound {
        /// Page URL
        url: String,
    },

    /// The lyrics site refused the request.
    #[error("Access forbidden when accessing URL: {url} - Genius may be blocking requests")]
    AccessForbidden {
        /// Page URL
        url: String,
    },

    /// The lyrics site rate limited us.
    #[error("Rate limited when accessing URL: {url}")]
    UpstreamRateLimited {
        /// Page URL
        url: String,
    },

    /// Any other non-success status from the lyrics site.
    #[error("HTTP error {status} when accessing URL: {url}")]
    PageStatus {
        /// HTTP status code
        status: u16,
        /// Page URL
        url: String,
    },

    /// Page fetch exceeded the configured timeout.
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout
        seconds: f64,
    },

    /// Could not reach the lyrics site.
    #[error("Failed to connect to Genius - check internet connection ({0})")]
    ConnectionFailed(String),

    /// The page was fetched but holds no lyrics container.
    #[error("No lyrics found on page: {0}")]
    ExtractionError(String),

    /// Any other scraping failure.
    #[error("Scraping failed: {0}")]
    ScrapingFailed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // API ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// The API has no record for the requested id.
    #[error("{subject} not found")]
    ApiNotFound {
        /// What was requested, e.g. "Annotation ID 2310153"
        subject: String,
    },

    /// The API rate limited us.
    #[error("Rate limit exceeded. Please try again later")]
    ApiRateLimited,

    /// Any other non-success status from the API.
    #[error("API error for {subject}: status {status}")]
    ApiStatus {
        /// What was requested
        subject: String,
        /// HTTP status code
        status: u16,
    },

    /// API call exceeded the configured timeout.
    #[error("API request for {subject} timed out after {seconds}s")]
    ApiTimeout {
        /// What was requested
        subject: String,
        /// Configured timeout
        seconds: f64,
    },

    /// Transport failure talking to the API.
    #[error("Network error for {subject}: {reason}")]
    ApiRequestFailed {
        /// What was requested
        subject: String,
        /// Transport error text
        reason: String,
    },

    /// The API answered 2xx but the body is unusable.
    #[error("Malformed API response for {subject}: {reason}")]
    ApiMalformedResponse {
        /// What was requested
        subject: String,
        /// What was wrong with it
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// The categories a caller can see in an error report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed caller input
    ValidationError,
    /// Local governor refused admission
    RateLimitError,
    /// Page fetch or extraction failed
    ScrapingError,
    /// Remote API failed
    ApiError,
    /// Everything else
    InternalError,
}

impl ErrorCategory {
    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ValidationError => "validation_error",
            ErrorCategory::RateLimitError => "rate_limit_error",
            ErrorCategory::ScrapingError => "scraping_error",
            ErrorCategory::ApiError => "api_error",
            ErrorCategory::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LyrionError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        LyrionError::ValidationError(message.into())
    }

    /// Returns the category this error is reported under.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LyrionError::ValidationError(_) => ErrorCategory::ValidationError,
            LyrionError::RateLimitExceeded(_) => ErrorCategory::RateLimitError,
            LyrionError::SongNotFound { .. }
            | LyrionError::AccessForbidden { .. }
            | LyrionError::UpstreamRateLimited { .. }
            | LyrionError::PageStatus { .. }
            | LyrionError::Timeout { .. }
            | LyrionError::ConnectionFailed(_)
            | LyrionError::ExtractionError(_)
            | LyrionError::ScrapingFailed(_) => ErrorCategory::ScrapingError,
            LyrionError::ApiNotFound { .. }
            | LyrionError::ApiRateLimited
            | LyrionError::ApiStatus { .. }
            | LyrionError::ApiTimeout { .. }
            | LyrionError::ApiRequestFailed { .. }
            | LyrionError::ApiMalformedResponse { .. } => ErrorCategory::ApiError,
            LyrionError::JsonError(_)
            | LyrionError::ConfigError(_)
            | LyrionError::InternalError(_) => ErrorCategory::InternalError,
        }
    }

    /// A short hint telling the caller what to do next, if there is one.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            LyrionError::SongNotFound { .. } | LyrionError::ExtractionError(_) => {
                Some("Try checking the song/artist spelling or try again later")
            }
            LyrionError::AccessForbidden { .. } => {
                Some("The lyrics site is refusing requests; wait a while before retrying")
            }
            LyrionError::UpstreamRateLimited { .. } | LyrionError::ApiRateLimited => {
                Some("Slow down and retry after a short pause")
            }
            LyrionError::Timeout { .. }
            | LyrionError::ConnectionFailed(_)
            | LyrionError::ApiTimeout { .. }
            | LyrionError::ApiRequestFailed { .. } => {
                Some("Check your network connection and try again")
            }
            LyrionError::PageStatus { .. } | LyrionError::ScrapingFailed(_) => {
                Some("Try again later")
            }
            LyrionError::ApiNotFound { .. } => Some("Check if the ID is correct"),
            LyrionError::RateLimitExceeded(_) => {
                Some("Wait until the reset time before sending more requests")
            }
            _ => None,
        }
    }

    /// Returns true if retrying the same request later may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LyrionError::RateLimitExceeded(_)
                | LyrionError::UpstreamRateLimited { .. }
                | LyrionError::Timeout { .. }
                | LyrionError::ConnectionFailed(_)
                | LyrionError::ApiRateLimited
                | LyrionError::ApiTimeout { .. }
                | LyrionError::ApiRequestFailed { .. }
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, LyrionError::ValidationError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use test_case::test_case;

    fn status() -> RateLimitStatus {
        RateLimitStatus {
            requests_made: 30,
            requests_remaining: 0,
            reset_time: Utc::now(),
            limit: 30,
        }
    }

    #[test]
    fn test_error_display() {
        let err = LyrionError::PageStatus {
            status: 503,
            url: "https://genius.com/x-lyrics".into(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("x-lyrics"));

        let err = LyrionError::RateLimitExceeded(status());
        assert_eq!(err.to_string(), "Maximum 30 requests per minute allowed");
    }

    #[test_case(LyrionError::validation("bad"), ErrorCategory::ValidationError; "validation")]
    #[test_case(LyrionError::RateLimitExceeded(status()), ErrorCategory::RateLimitError; "rate_limit")]
    #[test_case(LyrionError::SongNotFound { url: "u".into() }, ErrorCategory::ScrapingError; "song_not_found")]
    #[test_case(LyrionError::ExtractionError("none".into()), ErrorCategory::ScrapingError; "extraction")]
    #[test_case(LyrionError::Timeout { seconds: 30.0 }, ErrorCategory::ScrapingError; "timeout")]
    #[test_case(LyrionError::ApiRateLimited, ErrorCategory::ApiError; "api_rate_limited")]
    #[test_case(LyrionError::ApiNotFound { subject: "Song 1".into() }, ErrorCategory::ApiError; "api_not_found")]
    #[test_case(LyrionError::ConfigError("x".into()), ErrorCategory::InternalError; "config")]
    #[test_case(LyrionError::InternalError("x".into()), ErrorCategory::InternalError; "internal")]
    fn test_error_category(err: LyrionError, expected: ErrorCategory) {
        assert_eq!(err.category(), expected);
    }

    #[test]
    fn test_error_classification() {
        assert!(LyrionError::Timeout { seconds: 1.0 }.is_recoverable());
        assert!(LyrionError::ApiRateLimited.is_recoverable());
        assert!(!LyrionError::SongNotFound { url: "u".into() }.is_recoverable());
        assert!(LyrionError::validation("x").is_validation_error());
        assert!(!LyrionError::ApiRateLimited.is_validation_error());
    }

    #[test]
    fn test_scraping_errors_carry_suggestion() {
        let errs = [
            LyrionError::SongNotFound { url: "u".into() },
            LyrionError::AccessForbidden { url: "u".into() },
            LyrionError::UpstreamRateLimited { url: "u".into() },
            LyrionError::PageStatus { status: 500, url: "u".into() },
            LyrionError::Timeout { seconds: 30.0 },
            LyrionError::ConnectionFailed("refused".into()),
            LyrionError::ExtractionError("none".into()),
            LyrionError::ScrapingFailed("x".into()),
        ];
        for err in errs {
            assert_eq!(err.category(), ErrorCategory::ScrapingError);
            assert!(err.suggestion().is_some(), "{err:?} lacks a suggestion");
        }
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(ErrorCategory::RateLimitError.as_str(), "rate_limit_error");
        assert_eq!(
            serde_json::to_string(&ErrorCategory::ScrapingError).unwrap(),
            "\"scraping_error\""
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let lyrion_result: Result<serde_json::Value> = json_result.map_err(LyrionError::from);
        assert!(matches!(lyrion_result, Err(LyrionError::JsonError(_))));
    }
}
