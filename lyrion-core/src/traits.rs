//! Common traits for Lyrion.
//!
//! These are the two network seams of the system. The service layer only
//! talks to the outside world through them, which keeps governance and
//! error mapping testable without a network.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AnnotationRecord, ArtistDetails, SearchResults, SongDetails};

// ═══════════════════════════════════════════════════════════════════════════════
// PAGE FETCHING
// ═══════════════════════════════════════════════════════════════════════════════

/// Fetches raw lyrics page markup.
///
/// Implementations map transport outcomes to the scraping variants of
/// [`LyrionError`](crate::LyrionError): not found, forbidden, upstream rate
/// limit, other status, timeout, connection failure.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at `url` and returns its body.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// REMOTE LOOKUPS
// ═══════════════════════════════════════════════════════════════════════════════

/// Typed calls against the remote lyrics metadata API.
///
/// Every call issues at most one request, is never retried, and returns an
/// API-category error on failure.
#[async_trait]
pub trait GeniusApi: Send + Sync {
    /// Fetches the referent/annotation with the given numeric id.
    async fn fetch_annotation(&self, annotation_id: &str) -> Result<AnnotationRecord>;

    /// Searches songs; `limit` is already clamped by the caller.
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults>;

    /// Fetches song details.
    async fn fetch_song(&self, song_id: u64) -> Result<SongDetails>;

    /// Fetches artist details.
    async fn fetch_artist(&self, artist_id: u64) -> Result<ArtistDetails>;
}
