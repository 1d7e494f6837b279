//! Service configuration and shared app state.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use lyrion_cache::{CacheConfig, RateLimitConfig};
use lyrion_core::constants::{
    DEFAULT_MAX_ANNOTATION_IDS, DEFAULT_MAX_INPUT_LENGTH, DEFAULT_MAX_SEARCH_RESULTS,
};
use lyrion_core::error::{LyrionError, Result};
use lyrion_genius::GeniusConfig;
use lyrion_scraper::ScraperConfig;

use crate::service::LyricsService;

/// Log levels accepted in `LOG_LEVEL`.
const LOG_LEVELS: &[&str] = &["TRACE", "DEBUG", "INFO", "WARN", "WARNING", "ERROR"];

/// Caller input bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputLimits {
    /// Max characters of a song name, artist name or query
    pub max_input_length: usize,
    /// Ceiling for the search `limit`
    pub max_search_results: usize,
    /// Max ids in one batch annotation request
    pub max_annotation_ids: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            max_annotation_ids: DEFAULT_MAX_ANNOTATION_IDS,
        }
    }
}

/// Complete service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Remote API client
    pub genius: GeniusConfig,
    /// Lyrics page fetching
    pub scraper: ScraperConfig,
    /// Result cache
    pub cache: CacheConfig,
    /// Rate governor
    pub rate_limit: RateLimitConfig,
    /// Input bounds
    pub limits: InputLimits,
    /// Upper-cased log level
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            genius: GeniusConfig::default(),
            scraper: ScraperConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            limits: InputLimits::default(),
            log_level: "INFO".into(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from the environment (and `.env` if present),
    /// then validates it.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            genius: GeniusConfig {
                base_url: var("GENIUS_BASE_URL").unwrap_or(defaults.genius.base_url),
                token: var("GENIUS_API_TOKEN"),
                timeout_seconds: parse_var(&var, "SCRAPING_TIMEOUT", defaults.genius.timeout_seconds)?,
            },
            scraper: ScraperConfig {
                web_base_url: var("GENIUS_WEB_URL").unwrap_or(defaults.scraper.web_base_url),
                timeout_seconds: parse_var(&var, "SCRAPING_TIMEOUT", defaults.scraper.timeout_seconds)?,
            },
            cache: CacheConfig {
                ttl_seconds: parse_var(&var, "CACHE_TTL", defaults.cache.ttl_seconds)?,
            },
            rate_limit: RateLimitConfig {
                max_requests_per_minute: parse_var(
                    &var,
                    "MAX_REQUESTS_PER_MINUTE",
                    defaults.rate_limit.max_requests_per_minute,
                )?,
            },
            limits: InputLimits {
                max_input_length: parse_var(&var, "MAX_INPUT_LENGTH", defaults.limits.max_input_length)?,
                max_search_results: parse_var(
                    &var,
                    "MAX_SEARCH_RESULTS",
                    defaults.limits.max_search_results,
                )?,
                max_annotation_ids: parse_var(
                    &var,
                    "MAX_ANNOTATION_IDS",
                    defaults.limits.max_annotation_ids,
                )?,
            },
            log_level: var("LOG_LEVEL")
                .map(|level| level.trim().to_uppercase())
                .unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects non-positive bounds and unknown log levels.
    pub fn validate(&self) -> Result<()> {
        let timeout = self.scraper.timeout_seconds;
        if !(timeout.is_finite() && timeout > 0.0) {
            return Err(LyrionError::ConfigError("SCRAPING_TIMEOUT must be positive".into()));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(LyrionError::ConfigError("CACHE_TTL must be positive".into()));
        }
        if self.rate_limit.max_requests_per_minute == 0 {
            return Err(LyrionError::ConfigError("MAX_REQUESTS_PER_MINUTE must be positive".into()));
        }
        if self.limits.max_input_length == 0 {
            return Err(LyrionError::ConfigError("MAX_INPUT_LENGTH must be positive".into()));
        }
        if self.limits.max_search_results == 0 {
            return Err(LyrionError::ConfigError("MAX_SEARCH_RESULTS must be positive".into()));
        }
        if self.limits.max_annotation_ids == 0 {
            return Err(LyrionError::ConfigError("MAX_ANNOTATION_IDS must be positive".into()));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(LyrionError::ConfigError(format!("Unknown LOG_LEVEL: {}", self.log_level)));
        }
        Ok(())
    }

    /// Internal error reports carry raw details at debug verbosity.
    pub fn verbose_errors(&self) -> bool {
        matches!(self.log_level.as_str(), "DEBUG" | "TRACE")
    }
}

fn parse_var<T, F>(var: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| LyrionError::ConfigError(format!("Invalid value for {}: {}", name, raw))),
        None => Ok(default),
    }
}

/// State shared by every request handler.
pub struct AppState {
    /// Governed operations
    pub service: Arc<LyricsService>,
}

impl AppState {
    /// Builds the production service from configuration.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        Ok(Self::with_service(Arc::new(LyricsService::from_config(config)?)))
    }

    /// Wraps an already-built service.
    pub fn with_service(service: Arc<LyricsService>) -> Self {
        Self { service }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn load(vars: &[(&str, &str)]) -> Result<ServiceConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.genius.base_url, "https://api.genius.com");
        assert_eq!(config.scraper.web_base_url, "https://genius.com");
        assert_eq!(config.genius.token, None);
        assert_eq!(config.scraper.timeout_seconds, 30.0);
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.rate_limit.max_requests_per_minute, 30);
        assert_eq!(config.limits.max_input_length, 200);
        assert_eq!(config.limits.max_search_results, 20);
        assert_eq!(config.limits.max_annotation_ids, 50);
        assert_eq!(config.log_level, "INFO");
        assert!(!config.verbose_errors());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GENIUS_API_TOKEN", "tok"),
            ("SCRAPING_TIMEOUT", "2.5"),
            ("CACHE_TTL", "60"),
            ("MAX_REQUESTS_PER_MINUTE", "5"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(config.genius.token.as_deref(), Some("tok"));
        assert_eq!(config.genius.timeout_seconds, 2.5);
        assert_eq!(config.scraper.timeout_seconds, 2.5);
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.rate_limit.max_requests_per_minute, 5);
        assert!(config.verbose_errors());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("GENIUS_API_TOKEN", "  "), ("CACHE_TTL", "")]).unwrap();
        assert_eq!(config.genius.token, None);
        assert_eq!(config.cache.ttl_seconds, 3600);
    }

    #[test_case("CACHE_TTL", "abc"; "ttl_not_a_number")]
    #[test_case("CACHE_TTL", "0"; "ttl_zero")]
    #[test_case("CACHE_TTL", "-5"; "ttl_negative")]
    #[test_case("MAX_REQUESTS_PER_MINUTE", "0"; "ceiling_zero")]
    #[test_case("MAX_INPUT_LENGTH", "0"; "input_length_zero")]
    #[test_case("MAX_ANNOTATION_IDS", "many"; "batch_not_a_number")]
    #[test_case("SCRAPING_TIMEOUT", "0"; "timeout_zero")]
    #[test_case("SCRAPING_TIMEOUT", "NaN"; "timeout_nan")]
    #[test_case("LOG_LEVEL", "LOUD"; "unknown_level")]
    fn test_invalid_values(name: &str, value: &str) {
        let err = load(&[(name, value)]).unwrap_err();
        assert!(matches!(err, LyrionError::ConfigError(_)));
    }
}
