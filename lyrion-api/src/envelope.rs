//! Error reports returned by every operation.
//!
//! A failed operation produces exactly one [`ErrorReport`]. The same value
//! is printed by the CLI and serialized as the HTTP error body.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use lyrion_core::error::{ErrorCategory, LyrionError};
use lyrion_core::types::RateLimitStatus;

/// Categorized failure of one operation.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorReport {
    /// Short title, e.g. "Invalid input"
    pub error: String,
    /// Human readable message
    pub message: String,
    /// Failure category
    #[serde(rename = "type")]
    pub category: ErrorCategory,
    /// What the caller can do about it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Whether the same request may succeed later
    pub retryable: bool,
    /// Annotation id of a single lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<String>,
    /// Ids of a batch lookup, as sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_ids: Option<Vec<Value>>,
    /// Search query or requested id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Governor state when admission was refused
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_info: Option<RateLimitStatus>,
    /// Seconds spent before an internal failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
    /// Raw internal error text, only at debug verbosity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl ErrorReport {
    /// Builds the report for `err`.
    ///
    /// `action` completes "An unexpected error occurred while ..." for
    /// internal errors, whose raw text is only kept when `verbose` is set.
    pub fn new(err: &LyrionError, action: &str, verbose: bool) -> Self {
        let category = err.category();
        let internal = category == ErrorCategory::InternalError;

        let message = if internal {
            format!("An unexpected error occurred while {}", action)
        } else {
            err.to_string()
        };

        let rate_limit_info = match err {
            LyrionError::RateLimitExceeded(status) => Some(status.clone()),
            _ => None,
        };

        Self {
            error: title(category).to_string(),
            message,
            category,
            suggestion: err.suggestion().map(str::to_string),
            retryable: err.is_recoverable(),
            annotation_id: None,
            annotation_ids: None,
            query: None,
            rate_limit_info,
            elapsed_seconds: None,
            details: (internal && verbose).then(|| err.to_string()),
            status: status_for(err),
        }
    }

    /// Attaches the annotation id of a single lookup.
    pub fn with_annotation_id(mut self, id: impl Into<String>) -> Self {
        self.annotation_id = Some(id.into());
        self
    }

    /// Attaches the ids of a batch lookup.
    pub fn with_annotation_ids(mut self, ids: &[Value]) -> Self {
        self.annotation_ids = Some(ids.to_vec());
        self
    }

    /// Attaches the query or id the operation was asked for.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Records time spent. Only internal errors report it.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        if self.category == ErrorCategory::InternalError {
            self.elapsed_seconds = Some(elapsed.as_secs_f64());
        }
        self
    }

    /// HTTP status this report is served with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn title(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::ValidationError => "Invalid input",
        ErrorCategory::RateLimitError => "Rate limit exceeded",
        ErrorCategory::ScrapingError => "Scraping failed",
        ErrorCategory::ApiError => "API request failed",
        ErrorCategory::InternalError => "Unexpected error",
    }
}

fn status_for(err: &LyrionError) -> StatusCode {
    match err {
        LyrionError::SongNotFound { .. } | LyrionError::ApiNotFound { .. } => StatusCode::NOT_FOUND,
        LyrionError::Timeout { .. } | LyrionError::ApiTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => match err.category() {
            ErrorCategory::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::RateLimitError => StatusCode::TOO_MANY_REQUESTS,
            ErrorCategory::ScrapingError | ErrorCategory::ApiError => StatusCode::BAD_GATEWAY,
            ErrorCategory::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ErrorReport {}

impl IntoResponse for ErrorReport {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
