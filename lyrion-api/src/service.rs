//! Governed lyrics operations.
//!
//! Every operation except [`LyricsService::status`] runs the same pipeline:
//! rate governor, input validation, cache lookup, network call, cache
//! write. Failures leave the operation as a single [`ErrorReport`].

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use lyrion_cache::{cache_key, normalize_key_arg, CachePrefix, CacheStats, RateGovernor, ResponseCache};
use lyrion_core::constants::{DEFAULT_IDENTITY, DEFAULT_SEARCH_LIMIT};
use lyrion_core::error::{LyrionError, Result};
use lyrion_core::traits::{GeniusApi, PageFetcher};
use lyrion_core::types::{
    AnnotationBatch, AnnotationRecord, ArtistDetails, RateLimitStatus, SearchResults, SongDetails,
};
use lyrion_genius::GeniusClient;
use lyrion_scraper::{build_identifier, build_song_url, extract, HttpPageFetcher};

use crate::envelope::ErrorReport;
use crate::state::ServiceConfig;

/// Result of a governed operation.
pub type OpResult<T> = std::result::Result<T, ErrorReport>;

/// Snapshot returned by [`LyricsService::status`].
#[derive(Clone, Debug, Serialize)]
pub struct StatusReport {
    /// Always "running"
    pub server_status: &'static str,
    /// Effective configuration, token omitted
    pub configuration: ConfigSummary,
    /// Cache occupancy
    pub cache_statistics: CacheStats,
    /// Quota of the requesting identity
    pub rate_limit_status: RateLimitStatus,
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
}

/// Configuration as reported by the status operation.
#[derive(Clone, Debug, Serialize)]
pub struct ConfigSummary {
    /// Whether a bearer token is configured
    pub api_configured: bool,
    /// API base URL
    pub api_base_url: String,
    /// Lyrics site base URL
    pub web_base_url: String,
    /// Cache TTL in seconds
    pub cache_ttl: u64,
    /// Request timeout in seconds
    pub scraping_timeout: f64,
    /// Max input characters
    pub max_input_length: usize,
    /// Search limit ceiling
    pub max_search_results: usize,
    /// Batch ceiling
    pub max_annotation_ids: usize,
    /// Governor ceiling
    pub max_requests_per_minute: usize,
    /// Log level
    pub log_level: String,
}

/// Lyrics and metadata operations behind a shared cache and rate governor.
pub struct LyricsService {
    config: ServiceConfig,
    cache: Arc<ResponseCache>,
    governor: Arc<RateGovernor>,
    fetcher: Arc<dyn PageFetcher>,
    api: Arc<dyn GeniusApi>,
}

fn identity(caller: Option<&str>) -> &str {
    caller
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_IDENTITY)
}

impl LyricsService {
    /// Builds the service with HTTP backends.
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpPageFetcher::with_config(config.scraper.clone())?);
        let api = Arc::new(GeniusClient::with_config(config.genius.clone())?);
        Ok(Self::with_backends(config, fetcher, api))
    }

    /// Builds the service over the given backends.
    pub fn with_backends(
        config: ServiceConfig,
        fetcher: Arc<dyn PageFetcher>,
        api: Arc<dyn GeniusApi>,
    ) -> Self {
        Self {
            cache: Arc::new(ResponseCache::with_config(config.cache.clone())),
            governor: Arc::new(RateGovernor::with_config(config.rate_limit.clone())),
            config,
            fetcher,
            api,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the shared cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Forgets the rate history of `caller` and returns its fresh quota.
    /// Not rate limited.
    pub fn reset_rate_limit(&self, caller: Option<&str>) -> RateLimitStatus {
        let who = identity(caller);
        self.governor.reset(who);
        info!(identity = who, "Rate limit reset");
        self.governor.status(who)
    }

    fn report(&self, err: &LyrionError, action: &str, started: Instant) -> ErrorReport {
        if err.is_validation_error() {
            debug!(error = %err, "Rejected input while {}", action);
        } else {
            warn!(error = %err, recoverable = err.is_recoverable(), "Failed while {}", action);
        }
        ErrorReport::new(err, action, self.config.verbose_errors()).with_elapsed(started.elapsed())
    }

    fn admit(&self, caller: Option<&str>) -> Result<()> {
        let who = identity(caller);
        if self.governor.admit(who) {
            Ok(())
        } else {
            warn!(identity = who, "Rate limit exceeded");
            Err(LyrionError::RateLimitExceeded(self.governor.status(who)))
        }
    }

    /// Checks a free-text input and returns it trimmed and truncated.
    fn sanitize(&self, value: &str, field: &str) -> Result<String> {
        let max = self.config.limits.max_input_length;
        if value.trim().is_empty() {
            return Err(LyrionError::validation(format!("{} cannot be empty", field)));
        }
        if value.chars().count() > max {
            return Err(LyrionError::validation(format!(
                "{} too long (max {} characters)",
                field, max
            )));
        }
        Ok(value.trim().chars().take(max).collect())
    }

    fn positive_id(raw: &str, what: &str) -> Result<u64> {
        raw.trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                LyrionError::validation(format!("{} must be a positive integer, got: {}", what, raw))
            })
    }

    fn cached<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Discarding malformed cache entry");
                self.cache.remove(key);
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: String, value: &T) -> Result<()> {
        self.cache.set(key, serde_json::to_string(value)?);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // LYRICS
    // ═══════════════════════════════════════════════════════════════════════

    /// Fetches lyrics with inline annotation ids, rendered as text.
    #[instrument(skip(self))]
    pub async fn get_lyrics(
        &self,
        song_name: &str,
        artist_name: &str,
        caller: Option<&str>,
    ) -> OpResult<String> {
        let started = Instant::now();
        self.lyrics(song_name, artist_name, caller, started)
            .await
            .map_err(|e| self.report(&e, "fetching lyrics", started))
    }

    async fn lyrics(
        &self,
        song_name: &str,
        artist_name: &str,
        caller: Option<&str>,
        started: Instant,
    ) -> Result<String> {
        self.admit(caller)?;

        let song = self.sanitize(song_name, "Song name")?;
        let artist = self.sanitize(artist_name, "Artist name")?;

        // Keyed by page identifier: names that differ only in punctuation
        // or case address the same page.
        let key = cache_key(
            CachePrefix::Lyrics,
            &[&normalize_key_arg(&build_identifier(&song, &artist))],
        );
        if let Some(hit) = self.cache.get(&key) {
            info!(%song, %artist, "Cache hit for lyrics");
            return Ok(hit);
        }

        let url = build_song_url(&self.config.scraper.web_base_url, &song, &artist);
        info!(%song, %artist, %url, "Fetching lyrics");

        let markup = self.fetcher.fetch_page(&url).await?;
        let document = extract(&markup).map_err(|e| match e {
            LyrionError::ExtractionError(_) => LyrionError::ExtractionError(url.clone()),
            other => other,
        })?;

        let rendered = document.render();
        self.cache.set(key, rendered.clone());

        info!(
            lines = document.lines.len(),
            annotations = document.annotation_ids().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched lyrics"
        );
        Ok(rendered)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ANNOTATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Cache-first lookup of one annotation. Only successes are cached.
    async fn annotation(&self, annotation_id: &str) -> Result<AnnotationRecord> {
        let key = cache_key(CachePrefix::Annotation, &[annotation_id]);
        if let Some(record) = self.cached::<AnnotationRecord>(&key) {
            debug!(annotation_id, "Cache hit for annotation");
            return Ok(record);
        }

        let record = self.api.fetch_annotation(annotation_id).await?;
        self.store(key, &record)?;
        Ok(record)
    }

    /// Looks up one annotation by numeric id.
    #[instrument(skip(self))]
    pub async fn get_annotation(
        &self,
        annotation_id: &str,
        caller: Option<&str>,
    ) -> OpResult<AnnotationRecord> {
        let started = Instant::now();
        let result: Result<AnnotationRecord> = async {
            self.admit(caller)?;
            let id = Self::positive_id(annotation_id, "Annotation ID")?;
            self.annotation(&id.to_string()).await
        }
        .await;

        result.map_err(|e| {
            self.report(&e, "fetching the annotation", started)
                .with_annotation_id(annotation_id.trim())
        })
    }

    /// Looks up several annotations one after another.
    ///
    /// Ids arrive as raw JSON values; anything but a positive integer
    /// rejects the whole batch before any lookup. Once running, a failed
    /// id becomes a failed record and the batch goes on.
    #[instrument(skip(self))]
    pub async fn get_annotations(
        &self,
        annotation_ids: &[Value],
        caller: Option<&str>,
    ) -> OpResult<AnnotationBatch> {
        let started = Instant::now();
        let result: Result<AnnotationBatch> = async {
            self.admit(caller)?;
            let ids = self.validate_batch(annotation_ids)?;

            info!(count = ids.len(), "Fetching annotation batch");

            let mut records = Vec::with_capacity(ids.len());
            for id in ids {
                let id = id.to_string();
                match self.annotation(&id).await {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        warn!(annotation_id = %id, error = %e, "Annotation lookup failed");
                        records.push(AnnotationRecord::failed(id, e.to_string()));
                    }
                }
            }

            let batch = AnnotationBatch::new(records, started.elapsed().as_secs_f64());
            info!(
                successful = batch.successful,
                total = batch.total_requested,
                "Annotation batch complete"
            );
            Ok(batch)
        }
        .await;

        result.map_err(|e| {
            self.report(&e, "fetching annotations", started)
                .with_annotation_ids(annotation_ids)
        })
    }

    fn validate_batch(&self, annotation_ids: &[Value]) -> Result<Vec<i64>> {
        let max = self.config.limits.max_annotation_ids;
        if annotation_ids.is_empty() {
            return Err(LyrionError::validation(
                "annotation_ids must be a non-empty list of integers",
            ));
        }
        if annotation_ids.len() > max {
            return Err(LyrionError::validation(format!(
                "Too many annotation IDs. Maximum allowed: {}, received: {}",
                max,
                annotation_ids.len()
            )));
        }
        annotation_ids
            .iter()
            .enumerate()
            .map(|(index, value)| {
                value.as_i64().filter(|id| *id > 0).ok_or_else(|| {
                    let shown = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    LyrionError::validation(format!(
                        "Invalid annotation ID at index {}: {}. All IDs must be positive integers.",
                        index, shown
                    ))
                })
            })
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // METADATA
    // ═══════════════════════════════════════════════════════════════════════

    /// Searches songs. `limit` must be an integer when given; it defaults
    /// to 5 and is clamped into `[1, max_search_results]`. Results are not
    /// cached.
    #[instrument(skip(self))]
    pub async fn search_songs(
        &self,
        query: &str,
        limit: Option<&str>,
        caller: Option<&str>,
    ) -> OpResult<SearchResults> {
        let started = Instant::now();
        let result: Result<SearchResults> = async {
            self.admit(caller)?;
            let query = self.sanitize(query, "Query")?;
            let requested = match limit.map(str::trim).filter(|raw| !raw.is_empty()) {
                Some(raw) => raw.parse::<i64>().map_err(|_| {
                    LyrionError::validation(format!("limit must be an integer, got: {}", raw))
                })?,
                None => DEFAULT_SEARCH_LIMIT,
            };
            let max = self.config.limits.max_search_results as i64;
            let limit = requested.clamp(1, max.max(1)) as usize;

            info!(%query, limit, "Searching songs");
            self.api.search(&query, limit).await
        }
        .await;

        result.map_err(|e| self.report(&e, "searching songs", started).with_query(query.trim()))
    }

    /// Fetches song details by id.
    #[instrument(skip(self))]
    pub async fn get_song(&self, song_id: &str, caller: Option<&str>) -> OpResult<SongDetails> {
        let started = Instant::now();
        let result: Result<SongDetails> = async {
            self.admit(caller)?;
            let id = Self::positive_id(song_id, "Song ID")?;

            let key = cache_key(CachePrefix::Song, &[&id.to_string()]);
            if let Some(song) = self.cached::<SongDetails>(&key) {
                info!(song_id = id, "Cache hit for song");
                return Ok(song);
            }

            let song = self.api.fetch_song(id).await?;
            self.store(key, &song)?;
            Ok(song)
        }
        .await;

        result.map_err(|e| self.report(&e, "fetching the song", started).with_query(song_id.trim()))
    }

    /// Fetches artist details by id.
    #[instrument(skip(self))]
    pub async fn get_artist(&self, artist_id: &str, caller: Option<&str>) -> OpResult<ArtistDetails> {
        let started = Instant::now();
        let result: Result<ArtistDetails> = async {
            self.admit(caller)?;
            let id = Self::positive_id(artist_id, "Artist ID")?;

            let key = cache_key(CachePrefix::Artist, &[&id.to_string()]);
            if let Some(artist) = self.cached::<ArtistDetails>(&key) {
                info!(artist_id = id, "Cache hit for artist");
                return Ok(artist);
            }

            let artist = self.api.fetch_artist(id).await?;
            self.store(key, &artist)?;
            Ok(artist)
        }
        .await;

        result.map_err(|e| {
            self.report(&e, "fetching the artist", started)
                .with_query(artist_id.trim())
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STATUS
    // ═══════════════════════════════════════════════════════════════════════

    /// Reports configuration, cache occupancy and the caller's quota.
    /// Not rate limited.
    pub fn status(&self, caller: Option<&str>) -> StatusReport {
        let config = &self.config;
        StatusReport {
            server_status: "running",
            configuration: ConfigSummary {
                api_configured: config.genius.has_token(),
                api_base_url: config.genius.base_url.clone(),
                web_base_url: config.scraper.web_base_url.clone(),
                cache_ttl: config.cache.ttl_seconds,
                scraping_timeout: config.scraper.timeout_seconds,
                max_input_length: config.limits.max_input_length,
                max_search_results: config.limits.max_search_results,
                max_annotation_ids: config.limits.max_annotation_ids,
                max_requests_per_minute: config.rate_limit.max_requests_per_minute,
                log_level: config.log_level.clone(),
            },
            cache_statistics: self.cache.stats(),
            rate_limit_status: self.governor.status(identity(caller)),
            timestamp: Utc::now(),
        }
    }
}
