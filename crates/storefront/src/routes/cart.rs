//! Cart route handlers.
//!
//! Quantity rules are enforced here, not clamped: a quantity below 1 is a
//! validation error. Ownership is enforced inside the repository statements;
//! a foreign line item surfaces as the same 404 as a missing one.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marigold_core::{CartItemId, ProductId};

use crate::db::{CartRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// A cart line item as served to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// Cart contents response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub success: bool,
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
}

/// Item count response body.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub success: bool,
    pub count: i64,
}

/// Simple success response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: Option<i32>,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// `GET /api/cart` - cart contents with a subtotal.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<CartResponse>> {
    let items = CartRepository::new(state.pool()).items(user.id).await?;

    let items: Vec<CartItemView> = items
        .into_iter()
        .map(|item| {
            let line_total = item.unit_price * Decimal::from(item.quantity);
            CartItemView {
                id: item.id,
                product_id: item.product_id,
                name: item.product_name,
                unit_price: item.unit_price,
                quantity: item.quantity,
                line_total,
            }
        })
        .collect();

    let subtotal = items.iter().map(|item| item.line_total).sum();

    Ok(Json(CartResponse {
        success: true,
        items,
        subtotal,
    }))
}

/// `GET /api/cart/count` - total quantity across the cart.
pub async fn count(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<CartCountResponse>> {
    let count = CartRepository::new(state.pool()).item_count(user.id).await?;
    Ok(Json(CartCountResponse {
        success: true,
        count,
    }))
}

/// `POST /api/cart/items` - add a product to the cart.
pub async fn add_item(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<SuccessResponse>> {
    let quantity = body.quantity.unwrap_or(1);
    validate_quantity(quantity)?;

    CartRepository::new(state.pool())
        .add_item(user.id, body.product_id, quantity)
        .await
        .map_err(not_found_as("product"))?;

    Ok(Json(SuccessResponse { success: true }))
}

/// `PATCH /api/cart/items/{id}` - set a line item's quantity.
pub async fn update_item(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<SuccessResponse>> {
    validate_quantity(body.quantity)?;

    CartRepository::new(state.pool())
        .set_quantity(user.id, item_id, body.quantity)
        .await
        .map_err(not_found_as("cart item"))?;

    Ok(Json(SuccessResponse { success: true }))
}

/// `DELETE /api/cart/items/{id}` - remove a line item.
pub async fn remove_item(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(item_id): Path<CartItemId>,
) -> Result<Json<SuccessResponse>> {
    CartRepository::new(state.pool())
        .remove(user.id, item_id)
        .await
        .map_err(not_found_as("cart item"))?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Reject quantities below 1. Not clamped - the client is told.
fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Map a repository `NotFound` to a client-facing 404 for `what`; other
/// store errors propagate visibly (mutations never silently succeed).
fn not_found_as(what: &'static str) -> impl Fn(RepositoryError) -> AppError {
    move |e| match e {
        RepositoryError::NotFound => AppError::NotFound(what.to_string()),
        other => AppError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity_rejects_zero_and_negative() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_quantity_accepts_one_and_up() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());
    }

    #[test]
    fn test_ownership_mismatch_and_missing_item_collapse() {
        let mapper = not_found_as("cart item");
        let from_missing = mapper(RepositoryError::NotFound);
        // A foreign item also surfaces from the repository as NotFound, so
        // both produce byte-identical denials
        let from_foreign = mapper(RepositoryError::NotFound);
        assert_eq!(from_missing.to_string(), from_foreign.to_string());
        assert!(matches!(from_missing, AppError::NotFound(_)));
    }
}
