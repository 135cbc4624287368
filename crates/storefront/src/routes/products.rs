//! Public catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use marigold_core::ProductId;

use crate::catalog::shape::shape_product;
use crate::catalog::{ListingParams, ListingResponse, ListingSpec, Pagination};
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product detail response body.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub success: bool,
    pub product: crate::catalog::ListedProduct,
}

/// `GET /api/products` - the catalog listing.
///
/// Validation failures are surfaced as 400s, but a store failure is not:
/// the listing degrades to an empty success response so the page keeps
/// rendering, and the failure is recorded for the operators.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse>> {
    let spec =
        ListingSpec::from_params(params).map_err(|e| AppError::Validation(e.to_string()))?;

    match run_listing(&state, &spec).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "catalog listing query failed; serving empty result"
            );
            Ok(Json(ListingResponse::degraded(spec.page, spec.limit)))
        }
    }
}

/// Execute the listing plan and shape the response.
async fn run_listing(
    state: &AppState,
    spec: &ListingSpec,
) -> std::result::Result<ListingResponse, RepositoryError> {
    let repo = ProductRepository::new(state.pool());
    let (hits, total) = repo.list(spec).await?;

    let ids: Vec<ProductId> = hits.iter().map(|(product, _)| product.id).collect();
    let mut images = repo.images_for(&ids).await?;

    let products = hits
        .into_iter()
        .map(|(product, seller)| {
            let gallery = images.remove(&product.id).unwrap_or_default();
            shape_product(product, seller, gallery)
        })
        .collect();

    Ok(ListingResponse::new(
        products,
        Pagination::new(spec.page, spec.limit, total),
    ))
}

/// `GET /api/products/{slug}` - product detail.
///
/// Only active products are served; drafts and archived products 404 here
/// no matter who asks.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetailResponse>> {
    let repo = ProductRepository::new(state.pool());

    let (product, seller) = repo
        .get_active_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_string()))?;

    let mut images = repo.images_for(&[product.id]).await?;
    let gallery = images.remove(&product.id).unwrap_or_default();

    Ok(Json(ProductDetailResponse {
        success: true,
        product: shape_product(product, seller, gallery),
    }))
}
