//! CEO route handlers.
//!
//! Only a CEO-level superuser reaches these (the gate checks the exact
//! level). Granting and revoking superuser status is the one operation no
//! capability flag can delegate.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use marigold_core::{SuperuserLevel, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Grant request body.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GrantRequest {
    /// Tier to grant; defaults to standard.
    pub level: Option<SuperuserLevel>,
}

/// Simple success response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// `POST /api/ceo/superusers/{id}` - grant superuser status.
pub async fn grant_superuser(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path(target): Path<UserId>,
    Json(body): Json<GrantRequest>,
) -> Result<Json<SuccessResponse>> {
    let level = body.level.unwrap_or(SuperuserLevel::Standard);

    UserRepository::new(state.pool())
        .set_superuser(target, true, Some(level))
        .await
        .map_err(not_found_as_user)?;

    tracing::info!(actor = %actor.id, target = %target, %level, "superuser granted");

    Ok(Json(SuccessResponse { success: true }))
}

/// `DELETE /api/ceo/superusers/{id}` - revoke superuser status.
///
/// Stored capability flags are left in place; they grant nothing without
/// the superuser bit.
pub async fn revoke_superuser(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path(target): Path<UserId>,
) -> Result<Json<SuccessResponse>> {
    if actor.id == target {
        return Err(AppError::Validation(
            "cannot revoke your own superuser status".to_string(),
        ));
    }

    UserRepository::new(state.pool())
        .set_superuser(target, false, None)
        .await
        .map_err(not_found_as_user)?;

    tracing::info!(actor = %actor.id, target = %target, "superuser revoked");

    Ok(Json(SuccessResponse { success: true }))
}

fn not_found_as_user(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("user".to_string()),
        other => AppError::Database(other),
    }
}
