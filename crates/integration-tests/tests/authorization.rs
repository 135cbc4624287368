//! Integration tests for the route authorization gate.
//!
//! These tests require a running server; most also require the database.
//!
//! Run with: cargo test -p marigold-integration-tests -- --ignored

use marigold_integration_tests::{base_url, client, register_user};
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_public_routes_are_open() {
    let resp = client()
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    let resp = client()
        .get(format!("{}/api/categories", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_unknown_api_routes_require_authentication() {
    let resp = client()
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);

    let body: Value = resp.json().await.expect("json body");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_tiered_routes_deny_anonymous() {
    for path in ["/api/seller/products", "/api/superuser/users", "/api/ceo/superusers/1"] {
        let resp = client()
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), 401, "expected 401 for {path}");
    }
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_buyer_is_denied_tiered_routes() {
    let client = client();
    register_user(&client, "buyer-gate-test@marigoldmarket.dev").await;

    let resp = client
        .get(format!("{}/api/seller/products", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 403);

    let resp = client
        .get(format!("{}/api/superuser/users", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_disabled_endpoint_is_dead_for_everyone() {
    // Anonymous
    let anon = client()
        .post(format!("{}/api/make-me-ceo", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(anon.status(), 403);
    let anon_body: Value = anon.json().await.expect("json body");

    // Authenticated (any tier; promote this account to CEO out of band to
    // exercise the strongest form)
    let client = client();
    register_user(&client, "disabled-route-test@marigoldmarket.dev").await;
    let authed = client
        .post(format!("{}/api/make-me-ceo", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(authed.status(), 403);
    let authed_body: Value = authed.json().await.expect("json body");

    // Identical denial, no matter who asks
    assert_eq!(anon_body, authed_body);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_permission_status_shape() {
    let client = client();
    register_user(&client, "status-shape-test@marigoldmarket.dev").await;

    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("json body");
    let user = &body["user"];
    assert!(user["id"].as_i64().is_some());
    assert_eq!(user["role"], "buyer");
    assert_eq!(user["isSuperuser"], false);
    assert!(user["superuserLevel"].is_null());

    // A fresh buyer derives no capabilities
    let permissions = user["permissions"].as_object().expect("permissions map");
    assert_eq!(permissions.len(), 5);
    assert!(
        permissions
            .values()
            .all(|granted| granted.as_bool() == Some(false))
    );
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_me_requires_authentication() {
    let resp = client()
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);
}
