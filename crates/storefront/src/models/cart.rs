//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use marigold_core::{CartId, CartItemId, ProductId, UserId};

/// A user's cart. Each user has at most one.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}

/// A line item in a cart.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// Unique line item ID.
    pub id: CartItemId,
    /// Cart this item belongs to.
    pub cart_id: CartId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Product name at read time (joined for display).
    pub product_name: String,
    /// Product unit price at read time.
    pub unit_price: Decimal,
    /// Quantity, always >= 1.
    pub quantity: i32,
    /// When the item was added.
    pub created_at: DateTime<Utc>,
}
