//! API route handlers.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};

use tracing::debug;

use lyrion_core::types::{
    AnnotationBatch, AnnotationRecord, ArtistDetails, RateLimitStatus, SearchResults, SongDetails,
};

use crate::dto::*;
use crate::envelope::ErrorReport;
use crate::service::StatusReport;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ErrorReport>;

/// Header naming the caller's rate-limit bucket.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

static START_TIME: OnceLock<Instant> = OnceLock::new();

fn client_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Unparseable input falls back to empty input, which the service then
/// rejects as a validation error after rate limiting.
fn or_empty<T: Default>(extracted: std::result::Result<T, impl std::fmt::Display>) -> T {
    extracted.unwrap_or_else(|rejection| {
        debug!(%rejection, "Malformed request input");
        T::default()
    })
}

/// GET /api/v1/lyrics?song=&artist=
pub async fn get_lyrics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    params: std::result::Result<Query<LyricsQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let params = or_empty(params.map(|Query(params)| params));
    let text = state
        .service
        .get_lyrics(&params.song, &params.artist, client_id(&headers))
        .await?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

/// GET /api/v1/annotations/:id
pub async fn get_annotation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<AnnotationRecord>> {
    let record = state.service.get_annotation(&id, client_id(&headers)).await?;
    Ok(Json(record))
}

/// POST /api/v1/annotations/batch
pub async fn get_annotations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    req: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<AnnotationBatch>> {
    let req = or_empty(req.map(|Json(req)| req));
    let batch = state
        .service
        .get_annotations(&req.ids, client_id(&headers))
        .await?;
    Ok(Json(batch))
}

/// GET /api/v1/search?q=&limit=
pub async fn search_songs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    params: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResults>> {
    let params = or_empty(params.map(|Query(params)| params));
    let results = state
        .service
        .search_songs(&params.q, params.limit.as_deref(), client_id(&headers))
        .await?;
    Ok(Json(results))
}

/// GET /api/v1/songs/:id
pub async fn get_song(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SongDetails>> {
    let song = state.service.get_song(&id, client_id(&headers)).await?;
    Ok(Json(song))
}

/// GET /api/v1/artists/:id
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ArtistDetails>> {
    let artist = state.service.get_artist(&id, client_id(&headers)).await?;
    Ok(Json(artist))
}

/// GET /api/v1/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<StatusReport> {
    Json(state.service.status(client_id(&headers)))
}

/// POST /api/v1/admin/rate-limit/reset
pub async fn reset_rate_limit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<RateLimitStatus> {
    Json(state.service.reset_rate_limit(client_id(&headers)))
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: start.elapsed().as_secs(),
        api_configured: state.service.config().genius.has_token(),
    })
}
