//! Identity resolution and authentication extractors.
//!
//! The route authorization gate resolves the principal once per request
//! (fresh from the database, never from the cookie alone) and stashes it in
//! request extensions; the extractors here read it back out for handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use sqlx::PgPool;
use tower_sessions::Session;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::{CurrentUser, User, session_keys};

/// Resolve the authenticated principal for a request, if any.
///
/// Reads the session for a [`CurrentUser`] reference and re-fetches the
/// full account row so role, superuser, and capability changes apply on
/// the very next request. Anything that prevents resolution (no session,
/// stale user id, store failure) yields an anonymous request rather than
/// an error; a store failure is logged for operational visibility.
pub async fn resolve_current_user(pool: &PgPool, session: &Session) -> Option<User> {
    let current: CurrentUser = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()?;

    match UserRepository::new(pool).get_by_id(current.id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %current.id, "failed to resolve principal; treating request as anonymous");
            None
        }
    }
}

/// Extractor that requires an authenticated user.
///
/// The route authorization gate has already enforced the route's policy
/// class; this extractor is the handler-side handle on the principal. It
/// rejects with 401 if the gate let an anonymous request through (public
/// routes whose handler still demands a user).
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Unauthenticated("Authentication required".to_string()))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject anonymous requests.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<User>().cloned()))
    }
}

/// Helper to set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    let current = CurrentUser {
        id: user.id,
        email: user.email.as_str().to_owned(),
    };
    session.insert(session_keys::CURRENT_USER, current).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
