//! Seller backoffice route handlers.
//!
//! The gate guarantees a seller-tier principal; every mutation below still
//! carries the seller's id into the repository statement so a seller can
//! only ever touch their own rows.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marigold_core::{CategoryId, ProductId, ProductStatus};

use crate::db::products::{NewProduct, ProductPatch};
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// A seller's own product, any status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProductView {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub price: Decimal,
    pub status: ProductStatus,
    pub inventory_count: i32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Seller product list response body.
#[derive(Debug, Serialize)]
pub struct SellerProductsResponse {
    pub success: bool,
    pub products: Vec<SellerProductView>,
}

/// Create-product request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub inventory_count: Option<i32>,
    pub category_id: Option<CategoryId>,
    pub status: Option<ProductStatus>,
}

/// Update-product request body; absent fields are unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub inventory_count: Option<i32>,
    pub category_id: Option<CategoryId>,
    pub status: Option<ProductStatus>,
}

/// Created-product response body.
#[derive(Debug, Serialize)]
pub struct ProductCreatedResponse {
    pub success: bool,
    pub product: SellerProductView,
}

/// Simple success response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// `GET /api/seller/products` - the seller's own products, drafts included.
pub async fn list_products(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<SellerProductsResponse>> {
    let products = ProductRepository::new(state.pool())
        .list_by_seller(user.id)
        .await?
        .into_iter()
        .map(|p| SellerProductView {
            id: p.id,
            slug: p.slug,
            name: p.name,
            price: p.price,
            status: p.status,
            inventory_count: p.inventory_count,
            featured: p.featured,
            created_at: p.created_at,
        })
        .collect();

    Ok(Json(SellerProductsResponse {
        success: true,
        products,
    }))
}

/// `POST /api/seller/products` - create a product owned by the caller.
pub async fn create_product(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<ProductCreatedResponse>> {
    let slug = body.slug.trim().to_owned();
    let name = body.name.trim().to_owned();
    if slug.is_empty() || name.is_empty() {
        return Err(AppError::Validation(
            "slug and name must not be empty".to_string(),
        ));
    }
    if body.price < Decimal::ZERO {
        return Err(AppError::Validation("price must be >= 0".to_string()));
    }
    let inventory_count = body.inventory_count.unwrap_or(0);
    if inventory_count < 0 {
        return Err(AppError::Validation(
            "inventory count must be >= 0".to_string(),
        ));
    }

    let new = NewProduct {
        category_id: body.category_id,
        slug,
        name,
        description: body.description.unwrap_or_default(),
        price: body.price,
        inventory_count,
        status: body.status.unwrap_or_default(),
    };

    let product = ProductRepository::new(state.pool())
        .create(user.id, &new)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(msg) => AppError::Validation(msg),
            other => AppError::Database(other),
        })?;

    tracing::info!(product_id = %product.id, seller_id = %user.id, "product created");

    Ok(Json(ProductCreatedResponse {
        success: true,
        product: SellerProductView {
            id: product.id,
            slug: product.slug,
            name: product.name,
            price: product.price,
            status: product.status,
            inventory_count: product.inventory_count,
            featured: product.featured,
            created_at: product.created_at,
        },
    }))
}

/// `PATCH /api/seller/products/{id}` - update one of the caller's products.
pub async fn update_product(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<SuccessResponse>> {
    if let Some(price) = body.price
        && price < Decimal::ZERO
    {
        return Err(AppError::Validation("price must be >= 0".to_string()));
    }
    if let Some(count) = body.inventory_count
        && count < 0
    {
        return Err(AppError::Validation(
            "inventory count must be >= 0".to_string(),
        ));
    }

    let patch = ProductPatch {
        category_id: body.category_id,
        name: body.name,
        description: body.description,
        price: body.price,
        inventory_count: body.inventory_count,
        status: body.status,
    };

    ProductRepository::new(state.pool())
        .update_own(user.id, product_id, &patch)
        .await
        .map_err(not_found_as_product)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// `DELETE /api/seller/products/{id}` - delete one of the caller's products.
pub async fn delete_product(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<SuccessResponse>> {
    ProductRepository::new(state.pool())
        .delete_own(user.id, product_id)
        .await
        .map_err(not_found_as_product)?;

    tracing::info!(product_id = %product_id, seller_id = %user.id, "product deleted");

    Ok(Json(SuccessResponse { success: true }))
}

/// Foreign products and missing products surface identically.
fn not_found_as_product(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("product".to_string()),
        other => AppError::Database(other),
    }
}
