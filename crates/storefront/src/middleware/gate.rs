//! The route authorization gate.
//!
//! Applied to the whole router, outside every handler: classifies the
//! request path, resolves the principal, and lets the pure decision logic
//! in [`crate::authz`] allow or deny. Handlers never see a request the
//! gate rejected, and cannot opt out.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::authz::{Decision, authorize, classify};
use crate::error::AppError;
use crate::state::AppState;

use super::auth::resolve_current_user;

/// Gate middleware. Runs once per request, before any data access.
pub async fn route_authorization(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let class = classify(&path);
    let principal = resolve_current_user(state.pool(), &session).await;

    match authorize(class, principal.as_ref()) {
        Decision::Proceed => {
            if let Some(user) = principal {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        Decision::AuthenticationRequired => {
            tracing::debug!(path, ?class, "denied: authentication required");
            AppError::Unauthenticated("Authentication required".to_string()).into_response()
        }
        Decision::Forbidden(reason) => {
            tracing::debug!(path, ?class, reason, "denied: forbidden");
            AppError::Forbidden(reason.to_string()).into_response()
        }
    }
}
