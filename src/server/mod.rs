//! HTTP surface — Axum server exposing the cached quote.
//!
//! The in-repo consumer of the quote store's pull accessor: plain text
//! at `/`, JSON at `/api/*`. No rendering logic lives here.
//! CORS enabled for local development.

pub mod routes;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use routes::AppState;

/// Start the quote server.
///
/// This spawns a background task — it doesn't block.
pub fn spawn_server(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);

    tokio::spawn(async move {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        info!(port, "Quote server starting on http://localhost:{port}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind quote server port");

        axum::serve(listener, app)
            .await
            .expect("Quote server error");
    });

    Ok(())
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/quote", get(routes::get_quote))
        .route("/api/status", get(routes::get_status))
        .route("/health", get(routes::health))
        .route("/", get(routes::index))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;
    use crate::source::MockExcuseSource;
    use crate::store::QuoteStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use super::routes::ServerState;
    use tower::ServiceExt;

    const PAGE: &str = r##"<a href="/" rel="nofollow" style="text-decoration: none; color: #333;">The cache invalidated itself</a>"##;

    fn temp_state_path() -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("devexcuses_server_test_{}.json", uuid::Uuid::new_v4()));
        p.to_string_lossy().to_string()
    }

    fn empty_state() -> AppState {
        let store = QuoteStore::new(
            Arc::new(MockExcuseSource::new()),
            Extractor::new().unwrap(),
            Some(temp_state_path()),
        );
        Arc::new(ServerState::new(Arc::new(store)))
    }

    async fn populated_state() -> (AppState, String) {
        let path = temp_state_path();
        let mut mock = MockExcuseSource::new();
        mock.expect_name().return_const("mock".to_string());
        mock.expect_fetch_page()
            .times(1)
            .returning(|| Ok(PAGE.to_string()));

        let store = Arc::new(QuoteStore::new(
            Arc::new(mock),
            Extractor::new().unwrap(),
            Some(path.clone()),
        ));
        store.refresh().await;
        (Arc::new(ServerState::new(store)), path)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(empty_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_shows_placeholder_before_first_cycle() {
        let app = build_router(empty_state());
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), "Loading…");
    }

    #[tokio::test]
    async fn test_index_shows_current_quote() {
        let (state, path) = populated_state().await;
        let app = build_router(state);
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "The cache invalidated itself"
        );

        crate::storage::delete_state(Some(&path)).unwrap();
    }

    #[tokio::test]
    async fn test_quote_endpoint_null_before_first_cycle() {
        let app = build_router(empty_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/quote").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.is_null());
    }

    #[tokio::test]
    async fn test_quote_endpoint_returns_quote() {
        let (state, path) = populated_state().await;
        let app = build_router(state);
        let resp = app
            .oneshot(Request::builder().uri("/api/quote").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["text"], "The cache invalidated itself");
        assert!(json["last_updated"].is_string());

        crate::storage::delete_state(Some(&path)).unwrap();
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (state, path) = populated_state().await;
        let app = build_router(state);
        let resp = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["cycles_started"], 1);
        assert_eq!(json["quotes_updated"], 1);
        assert_eq!(json["has_quote"], true);
        assert!(json["uptime_secs"].as_i64().unwrap() >= 0);

        crate::storage::delete_state(Some(&path)).unwrap();
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = build_router(empty_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
