//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Lyrics scraping
        .route("/api/v1/lyrics", get(handlers::get_lyrics))

        // Annotations
        .route("/api/v1/annotations/batch", post(handlers::get_annotations))
        .route("/api/v1/annotations/:id", get(handlers::get_annotation))

        // Metadata
        .route("/api/v1/search", get(handlers::search_songs))
        .route("/api/v1/songs/:id", get(handlers::get_song))
        .route("/api/v1/artists/:id", get(handlers::get_artist))

        // Service status
        .route("/api/v1/status", get(handlers::get_status))
        .route("/api/v1/admin/rate-limit/reset", post(handlers::reset_rate_limit))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::service::tests::{service_with, MockApi, MockFetcher};
    use crate::state::ServiceConfig;

    fn app_with(config: ServiceConfig) -> Router {
        let service = service_with(
            config,
            Arc::new(MockFetcher::default()),
            Arc::new(MockApi::default()),
        );
        create_router(Arc::new(AppState::with_service(Arc::new(service))))
    }

    fn test_app() -> Router {
        app_with(ServiceConfig::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(test_app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_lyrics_plain_text() {
        let (status, body) = send(test_app(), get("/api/v1/lyrics?song=Rap%20God&artist=Eminem")).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("Line two [ID: 2310153]"));
    }

    #[tokio::test]
    async fn test_lyrics_missing_params_is_validation_error() {
        let (status, body) = send(test_app(), get("/api/v1/lyrics?song=Rap%20God")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body = json(&body);
        assert_eq!(body["type"], "validation_error");
        assert_eq!(body["message"], "Artist name cannot be empty");
    }

    #[tokio::test]
    async fn test_annotation() {
        let (status, body) = send(test_app(), get("/api/v1/annotations/2310153")).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["annotation_id"], "2310153");
        assert_eq!(body["url"], "https://genius.com/annotations/2310153");
    }

    #[tokio::test]
    async fn test_annotation_not_found() {
        let (status, body) = send(test_app(), get("/api/v1/annotations/404")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["type"], "api_error");
    }

    #[tokio::test]
    async fn test_annotation_batch() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/annotations/batch")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"ids": [1, 404]}"#))
            .unwrap();

        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["total_requested"], 2);
        assert_eq!(body["successful"], 1);
        assert_eq!(body["failed"], 1);
    }

    #[tokio::test]
    async fn test_annotation_batch_invalid() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/annotations/batch")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"ids": [1, -5]}"#))
            .unwrap();

        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(&body)["annotation_ids"], serde_json::json!([1, -5]));
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_annotation_batch_non_numeric_id() {
        let request = post_json("/api/v1/annotations/batch", r#"{"ids": [1, "abc"]}"#);
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body = json(&body);
        assert_eq!(body["type"], "validation_error");
        assert_eq!(
            body["message"],
            "Invalid annotation ID at index 1: abc. All IDs must be positive integers."
        );
        assert_eq!(body["annotation_ids"], serde_json::json!([1, "abc"]));
    }

    #[tokio::test]
    async fn test_annotation_batch_malformed_body() {
        for body in [r#"{"ids": "abc"}"#, "not json", "{}"] {
            let (status, response) = send(test_app(), post_json("/api/v1/annotations/batch", body)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            let response = json(&response);
            assert_eq!(response["type"], "validation_error");
            assert_eq!(response["message"], "annotation_ids must be a non-empty list of integers");
        }
    }

    #[tokio::test]
    async fn test_search_non_numeric_limit() {
        let (status, body) = send(test_app(), get("/api/v1/search?q=rap&limit=abc")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body = json(&body);
        assert_eq!(body["type"], "validation_error");
        assert_eq!(body["message"], "limit must be an integer, got: abc");
    }

    #[tokio::test]
    async fn test_malformed_input_still_charged() {
        let mut config = ServiceConfig::default();
        config.rate_limit.max_requests_per_minute = 1;
        let app = app_with(config);

        let (status, _) = send(app.clone(), get("/api/v1/search?q=rap&limit=abc")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(app, get("/api/v1/search?q=rap")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json(&body)["type"], "rate_limit_error");
    }

    #[tokio::test]
    async fn test_rate_limit_reset() {
        let mut config = ServiceConfig::default();
        config.rate_limit.max_requests_per_minute = 1;
        let app = app_with(config);

        let (status, _) = send(app.clone(), get("/api/v1/songs/1")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(app.clone(), get("/api/v1/songs/1")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

        let (status, body) = send(app.clone(), post_json("/api/v1/admin/rate-limit/reset", "")).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["requests_made"], 0);
        assert_eq!(body["requests_remaining"], 1);

        let (status, _) = send(app, get("/api/v1/songs/1")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search() {
        let (status, body) = send(test_app(), get("/api/v1/search?q=rap%20god&limit=3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["results_count"], 3);
    }

    #[tokio::test]
    async fn test_song_and_artist() {
        let (status, body) = send(test_app(), get("/api/v1/songs/235729")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["id"], 235729);

        let (status, body) = send(test_app(), get("/api/v1/artists/45")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["name"], "Eminem");

        let (status, _) = send(test_app(), get("/api/v1/songs/abc")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_rate_limit_per_client_header() {
        let mut config = ServiceConfig::default();
        config.rate_limit.max_requests_per_minute = 1;
        let app = app_with(config);

        let with_client = |id: &str| {
            Request::builder()
                .uri("/api/v1/songs/1")
                .header("x-client-id", id)
                .body(Body::empty())
                .unwrap()
        };

        let (status, _) = send(app.clone(), with_client("alice")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app.clone(), with_client("alice")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json(&body)["type"], "rate_limit_error");

        let (status, _) = send(app.clone(), with_client("bob")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app, get("/api/v1/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["server_status"], "running");
    }
}
