//! Product and category domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use marigold_core::{CategoryId, ProductId, ProductImageId, ProductStatus, UserId};

/// A catalog product.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Seller who owns this product.
    pub seller_id: UserId,
    /// Category, if assigned.
    pub category_id: Option<CategoryId>,
    /// URL slug (unique).
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Average review rating (0-5).
    pub rating: f64,
    /// Units on hand.
    pub inventory_count: i32,
    /// Lifecycle state.
    pub status: ProductStatus,
    /// Featured on the storefront by a superuser.
    pub featured: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An image attached to a product.
///
/// `position` orders the gallery; the image with the smallest position is
/// the primary image.
#[derive(Debug, Clone)]
pub struct ProductImage {
    /// Unique image ID.
    pub id: ProductImageId,
    /// Product this image belongs to.
    pub product_id: ProductId,
    /// Image URL.
    pub url: String,
    /// Alt text; listings fall back to the product name when unset.
    pub alt_text: Option<String>,
    /// Display position within the gallery.
    pub position: i32,
}

/// A catalog category.
#[derive(Debug, Clone)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// URL slug (unique).
    pub slug: String,
    /// Display name.
    pub name: String,
}
