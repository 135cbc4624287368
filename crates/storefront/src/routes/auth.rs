//! Authentication route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use marigold_core::{Role, SuperuserLevel, UserId};

use crate::authz::Permissions;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireUser, clear_current_user, set_current_user};
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The permission-status payload for a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub id: UserId,
    pub role: Role,
    pub is_superuser: bool,
    pub superuser_level: Option<SuperuserLevel>,
    pub permissions: Permissions,
}

impl UserStatus {
    /// Build the status payload, deriving permissions fresh.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            is_superuser: user.is_superuser,
            superuser_level: user.superuser_level,
            permissions: Permissions::derive(user),
        }
    }
}

/// Permission status response body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub user: UserStatus,
}

/// Auth action response body (register/login).
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserStatus,
}

/// Simple success response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// `POST /api/auth/register` - create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let user = AuthService::new(state.pool())
        .register_with_password(&body.email, body.name.trim(), &body.password)
        .await?;

    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(AuthResponse {
        success: true,
        user: UserStatus::for_user(&user),
    }))
}

/// `POST /api/auth/login`.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = AuthService::new(state.pool())
        .login_with_password(&body.email, &body.password)
        .await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to cycle session: {e}")))?;
    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        success: true,
        user: UserStatus::for_user(&user),
    }))
}

/// `POST /api/auth/logout`.
pub async fn logout(session: Session) -> Result<Json<SuccessResponse>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(Json(SuccessResponse { success: true }))
}

/// `GET /api/auth/me` - permission status for the current user.
///
/// Permissions are derived on this request; the response never reflects a
/// cached capability set.
pub async fn me(RequireUser(user): RequireUser) -> Result<Json<StatusResponse>> {
    Ok(Json(StatusResponse {
        user: UserStatus::for_user(&user),
    }))
}
