//! Integration test helpers for Marigold.
//!
//! # Running Tests
//!
//! These tests drive a running storefront over HTTP and are ignored by
//! default. They expect the demo catalog (`mg-cli seed`) in the database.
//!
//! ```bash
//! cargo run -p marigold-cli -- migrate
//! cargo run -p marigold-cli -- seed
//! cargo run -p marigold-storefront
//! cargo test -p marigold-integration-tests -- --ignored
//! ```

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store (session support).
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a throwaway account and leave its session in the client's
/// cookie store. Returns the user id from the response.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register_user(client: &Client, email: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&serde_json::json!({
            "email": email,
            "name": "Test User",
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("register request failed");

    assert!(
        resp.status().is_success(),
        "registration failed with {}",
        resp.status()
    );

    let body: serde_json::Value = resp.json().await.expect("register response body");
    body["user"]["id"].as_i64().expect("user id in response")
}
