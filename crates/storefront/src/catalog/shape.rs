//! Client-facing product shapes.
//!
//! Repositories hand back domain rows; this module reduces them to the JSON
//! the listing and detail endpoints serve. The image gallery is collapsed
//! around a primary image: the entry with the minimum display position,
//! with alt text falling back to the product name when a seller never set
//! any.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use marigold_core::{ProductId, ProductImageId, UserId};

use crate::models::{Product, ProductImage};

use super::{AvailabilityFacet, Pagination, SellerTier};

/// Seller fields joined into a listing row.
#[derive(Debug, Clone)]
pub struct SellerSummary {
    pub id: UserId,
    pub name: String,
    pub verified: bool,
    pub rating: Option<f64>,
}

/// A product as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedProduct {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub rating: f64,
    pub availability: AvailabilityFacet,
    pub featured: bool,
    pub seller: ListedSeller,
    pub images: Vec<ListedImage>,
    pub created_at: DateTime<Utc>,
}

/// Seller badge attached to a listed product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedSeller {
    pub id: UserId,
    pub name: String,
    pub tier: SellerTier,
}

/// A gallery image attached to a listed product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedImage {
    pub id: ProductImageId,
    pub url: String,
    pub alt: String,
    pub is_primary: bool,
}

/// Listing endpoint response body.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub success: bool,
    pub products: Vec<ListedProduct>,
    pub pagination: Pagination,
}

impl ListingResponse {
    /// Successful listing.
    #[must_use]
    pub const fn new(products: Vec<ListedProduct>, pagination: Pagination) -> Self {
        Self {
            success: true,
            products,
            pagination,
        }
    }

    /// Degraded listing served when the store query failed. Still a
    /// success-shaped 200 body; the failure is recorded server-side only.
    #[must_use]
    pub const fn degraded(page: u32, limit: u32) -> Self {
        Self {
            success: true,
            products: Vec::new(),
            pagination: Pagination::empty(page, limit),
        }
    }
}

/// Shape one product row plus its gallery for the client.
#[must_use]
pub fn shape_product(
    product: Product,
    seller: SellerSummary,
    mut images: Vec<ProductImage>,
) -> ListedProduct {
    images.sort_by_key(|img| img.position);
    let primary_position = images.first().map(|img| img.position);

    let images = images
        .into_iter()
        .map(|img| ListedImage {
            id: img.id,
            url: img.url,
            alt: img.alt_text.unwrap_or_else(|| product.name.clone()),
            is_primary: Some(img.position) == primary_position,
        })
        .collect();

    ListedProduct {
        id: product.id,
        slug: product.slug,
        name: product.name,
        description: product.description,
        price: product.price,
        rating: product.rating,
        availability: AvailabilityFacet::for_inventory(product.inventory_count),
        featured: product.featured,
        seller: ListedSeller {
            id: seller.id,
            name: seller.name,
            tier: SellerTier::for_seller(seller.verified, seller.rating),
        },
        images,
        created_at: product.created_at,
    }
}
