//! Lyrics page fetching over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{redirect, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use lyrion_core::constants::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_WEB_BASE_URL, SCRAPING_ACCEPT, SCRAPING_ACCEPT_LANGUAGE,
    SCRAPING_USER_AGENT,
};
use lyrion_core::error::{LyrionError, Result};
use lyrion_core::traits::PageFetcher;


/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// Scraper configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Base URL of the lyrics website
    pub web_base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: f64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            web_base_url: DEFAULT_WEB_BASE_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ScraperConfig {
    /// Points the scraper at a different site root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.web_base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Fetches lyrics pages with browser-like headers, following redirects.
///
/// One request per call, never retried.
pub struct HttpPageFetcher {
    config: ScraperConfig,
    http_client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Creates a fetcher with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Creates a fetcher with custom configuration.
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(SCRAPING_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(SCRAPING_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(SCRAPING_ACCEPT_LANGUAGE));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs_f64(config.timeout_seconds))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| LyrionError::ConfigError(format!("HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error, url: &str) -> LyrionError {
        if err.is_timeout() {
            warn!(url, seconds = self.config.timeout_seconds, "Page request timed out");
            LyrionError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else if err.is_connect() {
            warn!(url, error = %err, "Failed to connect");
            LyrionError::ConnectionFailed(err.to_string())
        } else {
            warn!(url, error = %err, "Page request failed");
            LyrionError::ScrapingFailed(err.to_string())
        }
    }
}

fn map_status(status: StatusCode, url: &str) -> LyrionError {
    let url = url.to_string();
    match status {
        StatusCode::FORBIDDEN => LyrionError::AccessForbidden { url },
        StatusCode::NOT_FOUND => LyrionError::SongNotFound { url },
        StatusCode::TOO_MANY_REQUESTS => LyrionError::UpstreamRateLimited { url },
        other => LyrionError::PageStatus {
            status: other.as_u16(),
            url,
        },
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Lyrics page request rejected");
            return Err(map_status(status, url));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e, url))?;

        debug!(url, bytes = body.len(), "Fetched lyrics page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::build_song_url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer) -> HttpPageFetcher {
        HttpPageFetcher::with_config(ScraperConfig::default().with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.web_base_url, "https://genius.com");
        assert_eq!(config.timeout_seconds, 30.0);
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Eminem-Rap-God-lyrics"))
            .and(header("user-agent", SCRAPING_USER_AGENT))
            .and(header("accept-language", SCRAPING_ACCEPT_LANGUAGE))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Rap God</h1>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher_for(&server);
        let body = fetcher
            .fetch_page(&build_song_url(&server.uri(), "Rap God", "Eminem"))
            .await
            .unwrap();
        assert_eq!(body, "<h1>Rap God</h1>");
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let body = fetcher_for(&server)
            .fetch_page(&format!("{}/old", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "moved");
    }

    #[tokio::test]
    async fn test_fetch_status_mapping() {
        let server = MockServer::start().await;
        for (route, status) in [("/a", 403u16), ("/b", 404), ("/c", 429), ("/d", 503)] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;
        }

        let fetcher = fetcher_for(&server);
        let url = |route: &str| format!("{}{}", server.uri(), route);

        assert!(matches!(
            fetcher.fetch_page(&url("/a")).await,
            Err(LyrionError::AccessForbidden { .. })
        ));
        assert!(matches!(
            fetcher.fetch_page(&url("/b")).await,
            Err(LyrionError::SongNotFound { .. })
        ));
        assert!(matches!(
            fetcher.fetch_page(&url("/c")).await,
            Err(LyrionError::UpstreamRateLimited { .. })
        ));
        match fetcher.fetch_page(&url("/d")).await {
            Err(LyrionError::PageStatus { status, url }) => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/d"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::with_config(
            ScraperConfig::default()
                .with_base_url(server.uri())
                .with_timeout(0.05),
        )
        .unwrap();

        let err = fetcher.fetch_page(&server.uri()).await.unwrap_err();
        assert!(matches!(err, LyrionError::Timeout { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_fetch_connection_failure() {
        let fetcher = HttpPageFetcher::new().unwrap();
        let err = fetcher.fetch_page("http://127.0.0.1:1/x-lyrics").await.unwrap_err();
        assert!(matches!(err, LyrionError::ConnectionFailed(_)));
    }
}
