//! HTTP API route definitions.

use axum::{
    http::{Method, StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{health, metrics, root, AppState};
use super::middleware::track_metrics;

/// Create the API router.
///
/// Every route, including the fallback, is wrapped by [`track_metrics`].
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, format!("Cannot {} {}", method, uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{self as app_metrics, EXPOSITION_CONTENT_TYPE};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app() -> Router {
        let handle = app_metrics::install().unwrap();
        create_router(AppState::new(handle))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_endpoint_returns_healthy() {
        let (status, body) = get_body(app(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn root_endpoint_reports_host_and_version() {
        let (status, body) = get_body(app(), "/").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], "Sample DevOps Application");
        assert_eq!(json["version"], "1.0.0");
        assert!(!json["hostname"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn metrics_endpoint_sets_exposition_content_type() {
        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            EXPOSITION_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn unknown_path_is_404_and_counted_by_raw_path() {
        let (status, _) = get_body(app(), "/routes-test-missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, exposition) = get_body(app(), "/metrics").await;
        assert!(exposition
            .lines()
            .any(|line| line.starts_with("http_requests_total")
                && line.contains("route=\"/routes-test-missing\"")
                && line.contains("status_code=\"404\"")));
    }

    #[tokio::test]
    async fn not_found_body_names_request_method() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/routes-test-post")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Cannot POST /routes-test-post");
    }
}
