//! Cart repository.
//!
//! Every mutation carries the owning user in its WHERE clause. A line item
//! that doesn't exist and a line item owned by someone else produce the
//! same `NotFound`, so the API cannot be used to probe other users' carts.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use marigold_core::{CartId, CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        // DO UPDATE is a no-op write that makes RETURNING yield the
        // existing row on conflict
        let row = sqlx::query(
            "INSERT INTO carts (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING id, user_id, created_at",
        )
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        map_cart(&row)
    }

    /// List the items in the user's cart, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.created_at,
                    p.name AS product_name, p.price AS unit_price
             FROM cart_items ci
             JOIN carts c ON c.id = ci.cart_id
             JOIN products p ON p.id = ci.product_id
             WHERE c.user_id = $1
             ORDER BY ci.created_at, ci.id",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_item).collect()
    }

    /// Add a product to the user's cart, summing quantities on repeat adds.
    ///
    /// Only active products can be added; a missing or non-active product
    /// is reported as `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product isn't purchasable.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItemId, RepositoryError> {
        let cart = self.get_or_create(user_id).await?;

        let row = sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity)
             SELECT $1, p.id, $2
             FROM products p
             WHERE p.id = $3 AND p.status = 'active'
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
             RETURNING id",
        )
        .bind(cart.id.as_i32())
        .bind(quantity)
        .bind(product_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };

        Ok(CartItemId::new(row.try_get("id")?))
    }

    /// Set the quantity of a line item owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist or
    /// belongs to another user's cart (deliberately indistinguishable).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items ci
             SET quantity = $1
             FROM carts c
             WHERE ci.id = $2 AND c.id = ci.cart_id AND c.user_id = $3",
        )
        .bind(quantity)
        .bind(item_id.as_i32())
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove a line item owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist or
    /// belongs to another user's cart (deliberately indistinguishable).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM cart_items ci
             USING carts c
             WHERE ci.id = $1 AND c.id = ci.cart_id AND c.user_id = $2",
        )
        .bind(item_id.as_i32())
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Total quantity across the user's cart (for the badge).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(ci.quantity), 0)
             FROM cart_items ci
             JOIN carts c ON c.id = ci.cart_id
             WHERE c.user_id = $1",
        )
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}

fn map_cart(row: &PgRow) -> Result<Cart, RepositoryError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Cart {
        id: CartId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        created_at,
    })
}

fn map_item(row: &PgRow) -> Result<CartItem, RepositoryError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(CartItem {
        id: CartItemId::new(row.try_get("id")?),
        cart_id: CartId::new(row.try_get("cart_id")?),
        product_id: ProductId::new(row.try_get("product_id")?),
        product_name: row.try_get("product_name")?,
        unit_price: row.try_get("unit_price")?,
        quantity: row.try_get("quantity")?,
        created_at,
    })
}
