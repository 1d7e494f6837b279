//! Genius API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use lyrion_core::constants::{API_USER_AGENT, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use lyrion_core::error::{LyrionError, Result};
use lyrion_core::traits::GeniusApi;
use lyrion_core::types::{AnnotationRecord, ArtistDetails, SearchHit, SearchResults, SongDetails};

use crate::dto::{ArtistResponse, Envelope, ReferentResponse, SearchResponse, SongResponse};

/// Genius API client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeniusConfig {
    /// API base URL
    pub base_url: String,
    /// Bearer token; requests go out unauthenticated without one
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: f64,
}

impl std::fmt::Debug for GeniusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeniusConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for GeniusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeniusConfig {
    /// Creates config with the given bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Points the client at a different API root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Returns true if a non-blank token is configured.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Client for the Genius REST API.
pub struct GeniusClient {
    config: GeniusConfig,
    http_client: reqwest::Client,
}

impl GeniusClient {
    /// Creates a client with custom configuration.
    pub fn with_config(config: GeniusConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(API_USER_AGENT)
            .timeout(Duration::from_secs_f64(config.timeout_seconds))
            .build()
            .map_err(|e| LyrionError::ConfigError(format!("HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Issues one GET and decodes the `response` member of the body.
    ///
    /// `subject` names what was asked for and ends up in every error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        subject: &str,
    ) -> Result<T> {
        let mut request = self.http_client.get(self.endpoint(path)).query(query);
        if let Some(token) = self.config.token.as_deref().filter(|_| self.config.has_token()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LyrionError::ApiTimeout {
                    subject: subject.to_string(),
                    seconds: self.config.timeout_seconds,
                }
            } else {
                LyrionError::ApiRequestFailed {
                    subject: subject.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(subject, status = status.as_u16(), "Genius API request rejected");
            return Err(match status {
                StatusCode::NOT_FOUND => LyrionError::ApiNotFound {
                    subject: subject.to_string(),
                },
                StatusCode::TOO_MANY_REQUESTS => LyrionError::ApiRateLimited,
                other => LyrionError::ApiStatus {
                    subject: subject.to_string(),
                    status: other.as_u16(),
                },
            });
        }

        let body = response.text().await.map_err(|e| LyrionError::ApiRequestFailed {
            subject: subject.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.response)
            .map_err(|e| LyrionError::ApiMalformedResponse {
                subject: subject.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl GeniusApi for GeniusClient {
    #[instrument(skip(self))]
    async fn fetch_annotation(&self, annotation_id: &str) -> Result<AnnotationRecord> {
        let subject = format!("Annotation ID {}", annotation_id);
        let response: ReferentResponse = self
            .get_json(
                &format!("referents/{}", annotation_id),
                &[("text_format", "plain".into())],
                &subject,
            )
            .await?;

        let referent = response.referent.ok_or_else(|| LyrionError::ApiMalformedResponse {
            subject,
            reason: "No data returned from API".into(),
        })?;

        debug!(annotation_id, annotations = referent.annotations.len(), "Fetched referent");
        Ok(referent.into_record(annotation_id))
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let subject = format!("Search '{}'", query);
        let response: SearchResponse = self
            .get_json(
                "search",
                &[("q", query.to_string()), ("per_page", limit.to_string())],
                &subject,
            )
            .await?;

        let hits: Vec<SearchHit> = response.hits.into_iter().map(Into::into).collect();
        debug!(query, hits = hits.len(), "Search complete");
        Ok(SearchResults::new(query, hits))
    }

    #[instrument(skip(self))]
    async fn fetch_song(&self, song_id: u64) -> Result<SongDetails> {
        let response: SongResponse = self
            .get_json(
                &format!("songs/{}", song_id),
                &[("text_format", "plain".into())],
                &format!("Song ID {}", song_id),
            )
            .await?;

        debug!(song_id, title = %response.song.title, "Fetched song");
        Ok(response.song.into())
    }

    #[instrument(skip(self))]
    async fn fetch_artist(&self, artist_id: u64) -> Result<ArtistDetails> {
        let response: ArtistResponse = self
            .get_json(
                &format!("artists/{}", artist_id),
                &[("text_format", "plain".into())],
                &format!("Artist ID {}", artist_id),
            )
            .await?;

        debug!(artist_id, name = %response.artist.name, "Fetched artist");
        Ok(response.artist.into())
    }
}
