//! Category route handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use marigold_core::CategoryId;

use crate::db::CategoryRepository;
use crate::error::Result;
use crate::state::AppState;

/// A category as served to clients.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
}

/// Category list response body.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<CategoryView>,
}

/// `GET /api/categories` - all catalog categories.
pub async fn index(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    let categories = CategoryRepository::new(state.pool())
        .list()
        .await?
        .into_iter()
        .map(|c| CategoryView {
            id: c.id,
            slug: c.slug,
            name: c.name,
        })
        .collect();

    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}
