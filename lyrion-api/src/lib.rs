//! # Lyrion API Server
//!
//! Governed lyrics operations ([`LyricsService`]) and the REST surface
//! over them.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness
//! - `GET /api/v1/lyrics?song=&artist=` - Lyrics with inline `[ID: n]` markers
//! - `GET /api/v1/annotations/:id` - One annotation
//! - `POST /api/v1/annotations/batch` - Several annotations, `{"ids": [...]}`
//! - `GET /api/v1/search?q=&limit=` - Song search
//! - `GET /api/v1/songs/:id` - Song details
//! - `GET /api/v1/artists/:id` - Artist details
//! - `GET /api/v1/status` - Configuration, cache and quota snapshot
//!
//! Callers may name their rate-limit bucket with the `x-client-id` header;
//! without it every request shares one bucket.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lyrion_api::{ApiServer, ServiceConfig};
//!
//! let server = ApiServer::new(ServiceConfig::from_env()?)?;
//! server.run(([127, 0, 0, 1], 3001)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod envelope;
mod handlers;
mod routes;
mod service;
mod state;

pub use envelope::ErrorReport;
pub use handlers::CLIENT_ID_HEADER;
pub use routes::create_router;
pub use service::{ConfigSummary, LyricsService, OpResult, StatusReport};
pub use state::{AppState, InputLimits, ServiceConfig};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use lyrion_core::error::Result;

/// API server for Lyrion.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server over HTTP backends built from `config`.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// Creates a server over an existing service.
    pub fn with_service(service: Arc<LyricsService>) -> Self {
        Self {
            state: Arc::new(AppState::with_service(service)),
        }
    }

    /// Creates the router with all routes and layers configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Lyrion API server listening on {}", addr);

        axum::serve(listener, self.router()).await
    }
}
