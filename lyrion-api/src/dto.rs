//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query string of `GET /api/v1/lyrics`.
#[derive(Debug, Default, Deserialize)]
pub struct LyricsQuery {
    /// Song name
    #[serde(default)]
    pub song: String,
    /// Artist name
    #[serde(default)]
    pub artist: String,
}

/// Query string of `GET /api/v1/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text
    #[serde(default)]
    pub q: String,
    /// Requested number of results, validated by the service
    #[serde(default)]
    pub limit: Option<String>,
}

/// Body of `POST /api/v1/annotations/batch`.
#[derive(Debug, Default, Deserialize)]
pub struct BatchRequest {
    /// Annotation ids in the order results should come back. Kept raw so
    /// that malformed ids reach validation.
    #[serde(default)]
    pub ids: Vec<Value>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the first health check
    pub uptime_seconds: u64,
    /// Whether a Genius API token is configured
    pub api_configured: bool,
}
