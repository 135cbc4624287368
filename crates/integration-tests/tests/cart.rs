//! Integration tests for cart line-item mutation.
//!
//! These tests require a running server and the seeded demo catalog.
//!
//! Run with: cargo test -p marigold-integration-tests -- --ignored

use marigold_integration_tests::{base_url, client, register_user};
use reqwest::Client;
use serde_json::{Value, json};

/// Add the first product from the catalog to the cart; returns the line
/// item id read back from the cart.
async fn add_first_product(client: &Client) -> i64 {
    let listing: Value = client
        .get(format!("{}/api/products?limit=1", base_url()))
        .send()
        .await
        .expect("listing request failed")
        .json()
        .await
        .expect("listing body");
    let product_id = listing["products"][0]["id"].as_i64().expect("product id");

    let resp = client
        .post(format!("{}/api/cart/items", base_url()))
        .json(&json!({ "productId": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("add request failed");
    assert!(resp.status().is_success());

    let cart: Value = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart body");
    cart["items"][0]["id"].as_i64().expect("item id")
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_set_quantity_and_read_back() {
    let client = client();
    register_user(&client, "cart-qty-test@marigoldmarket.dev").await;
    let item_id = add_first_product(&client).await;

    let resp = client
        .patch(format!("{}/api/cart/items/{item_id}", base_url()))
        .json(&json!({ "quantity": 3 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), 200);

    let cart: Value = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["items"][0]["quantity"], 3);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_zero_quantity_is_rejected_not_clamped() {
    let client = client();
    register_user(&client, "cart-zero-test@marigoldmarket.dev").await;
    let item_id = add_first_product(&client).await;

    let resp = client
        .patch(format!("{}/api/cart/items/{item_id}", base_url()))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), 400);

    // Quantity unchanged
    let cart: Value = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_foreign_item_is_indistinguishable_from_missing() {
    // First user owns an item
    let owner = client();
    register_user(&owner, "cart-owner-test@marigoldmarket.dev").await;
    let item_id = add_first_product(&owner).await;

    // Second user tries to mutate it
    let intruder = client();
    register_user(&intruder, "cart-intruder-test@marigoldmarket.dev").await;

    let foreign = intruder
        .patch(format!("{}/api/cart/items/{item_id}", base_url()))
        .json(&json!({ "quantity": 9 }))
        .send()
        .await
        .expect("update request failed");
    let foreign_status = foreign.status();
    let foreign_body: Value = foreign.json().await.expect("json body");

    // Same user, an id that does not exist
    let missing = intruder
        .patch(format!("{}/api/cart/items/999999", base_url()))
        .json(&json!({ "quantity": 9 }))
        .send()
        .await
        .expect("update request failed");
    let missing_status = missing.status();
    let missing_body: Value = missing.json().await.expect("json body");

    assert_eq!(foreign_status, 404);
    assert_eq!(foreign_status, missing_status);
    assert_eq!(foreign_body, missing_body);

    // And the owner's quantity is untouched
    let cart: Value = owner
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_remove_item() {
    let client = client();
    register_user(&client, "cart-remove-test@marigoldmarket.dev").await;
    let item_id = add_first_product(&client).await;

    let resp = client
        .delete(format!("{}/api/cart/items/{item_id}", base_url()))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 200);

    let cart: Value = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));

    // Deleting again is the collapsed 404
    let resp = client
        .delete(format!("{}/api/cart/items/{item_id}", base_url()))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 404);
}
