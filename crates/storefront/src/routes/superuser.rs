//! Superuser backoffice route handlers.
//!
//! The gate admits any superuser-tier principal; each handler then checks
//! the specific capability it needs, derived fresh from the stored flags.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marigold_core::{CapabilityFlags, ProductId, Role, SuperuserLevel, UserId};

use crate::authz::Permissions;
use crate::catalog::Pagination;
use crate::db::products::CatalogStats;
use crate::db::{ProductRepository, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// User list query parameters.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// An account as shown to superusers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_superuser: bool,
    pub superuser_level: Option<SuperuserLevel>,
    pub flags: CapabilityFlags,
    pub created_at: DateTime<Utc>,
}

/// User list response body.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<AccountView>,
    pub pagination: Pagination,
}

/// Capability update request body (full replacement).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest {
    pub create_products: bool,
    pub moderate_content: bool,
    pub view_analytics: bool,
    pub manage_users: bool,
    pub feature_products: bool,
}

/// Feature request body.
#[derive(Debug, Deserialize)]
pub struct FeatureRequest {
    pub featured: bool,
}

/// Analytics response body.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub stats: CatalogStats,
}

/// Simple success response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Maximum accounts per page.
const MAX_USER_PAGE_SIZE: u32 = 100;

/// Check a derived capability, naming it in the denial.
fn require_capability(granted: bool, name: &str) -> Result<()> {
    if granted {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Missing capability: {name}"
        )))
    }
}

/// `GET /api/superuser/users` - paginated account list.
pub async fn list_users(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<UserListParams>,
) -> Result<Json<UserListResponse>> {
    require_capability(Permissions::derive(&user).manage_users, "manage_users")?;

    let page = params.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::Validation("page must be at least 1".to_string()));
    }
    let limit = params.limit.unwrap_or(25).clamp(1, MAX_USER_PAGE_SIZE);

    let (users, total) = UserRepository::new(state.pool()).list(page, limit).await?;

    let users = users
        .into_iter()
        .map(|u| AccountView {
            id: u.id,
            email: u.email.as_str().to_owned(),
            name: u.name,
            role: u.role,
            is_superuser: u.is_superuser,
            superuser_level: u.superuser_level,
            flags: u.flags,
            created_at: u.created_at,
        })
        .collect();

    Ok(Json(UserListResponse {
        success: true,
        users,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// `PATCH /api/superuser/users/{id}/capabilities` - replace stored flags.
///
/// The flags take effect on the target's next request; nothing is cached.
pub async fn update_capabilities(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(target): Path<UserId>,
    Json(body): Json<CapabilitiesRequest>,
) -> Result<Json<SuccessResponse>> {
    require_capability(Permissions::derive(&user).manage_users, "manage_users")?;

    let flags = CapabilityFlags {
        create_products: body.create_products,
        moderate_content: body.moderate_content,
        view_analytics: body.view_analytics,
        manage_users: body.manage_users,
        feature_products: body.feature_products,
    };

    UserRepository::new(state.pool())
        .update_flags(target, flags)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("user".to_string()),
            other => AppError::Database(other),
        })?;

    tracing::info!(actor = %user.id, target = %target, "capability flags updated");

    Ok(Json(SuccessResponse { success: true }))
}

/// `POST /api/superuser/products/{id}/feature` - feature or unfeature.
pub async fn feature_product(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<ProductId>,
    Json(body): Json<FeatureRequest>,
) -> Result<Json<SuccessResponse>> {
    require_capability(
        Permissions::derive(&user).feature_products,
        "feature_products",
    )?;

    ProductRepository::new(state.pool())
        .set_featured(product_id, body.featured)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("product".to_string()),
            other => AppError::Database(other),
        })?;

    tracing::info!(actor = %user.id, product_id = %product_id, featured = body.featured, "product feature flag set");

    Ok(Json(SuccessResponse { success: true }))
}

/// `GET /api/superuser/analytics` - aggregate store counts.
pub async fn analytics(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<AnalyticsResponse>> {
    require_capability(Permissions::derive(&user).view_analytics, "view_analytics")?;

    let stats = ProductRepository::new(state.pool()).catalog_stats().await?;

    Ok(Json(AnalyticsResponse {
        success: true,
        stats,
    }))
}
