//! Marigold Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` wires
//! [`app`] to a listener with Sentry and tracing initialized.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod authz;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with its middleware stack.
///
/// Execution order per request: trace span, request id, session, route
/// authorization gate, then the handler. The gate sees every route; no
/// handler is reachable without passing it.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.pool(), state.config());

    Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::route_authorization,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    /// State backed by a lazy pool that points at nothing. Requests that
    /// never reach the database (or degrade on failure) still work.
    fn unreachable_state() -> AppState {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://nobody@127.0.0.1:1/nothing"),
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/nothing")
            .expect("lazy pool");
        AppState::new(config, pool)
    }

    async fn get(path: &str) -> (StatusCode, String) {
        let app = app(unreachable_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(path)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_health_is_reachable_anonymously() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_disabled_endpoint_is_forbidden_before_any_handler() {
        let (status, body) = get("/api/make-me-ceo").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("disabled"));
    }

    #[tokio::test]
    async fn test_protected_api_requires_authentication() {
        let (status, body) = get("/api/cart").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("error"));
    }

    #[tokio::test]
    async fn test_superuser_route_denied_anonymously() {
        let (status, _) = get("/api/superuser/users").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_listing_degrades_to_empty_success_on_store_failure() {
        let (status, body) = get("/api/products").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(json["success"], true);
        assert_eq!(json["products"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["pagination"]["total"], 0);
        assert_eq!(json["pagination"]["pages"], 0);
    }

    #[tokio::test]
    async fn test_listing_validation_errors_are_not_degraded() {
        let (status, body) = get("/api/products?page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("page"));
    }
}
