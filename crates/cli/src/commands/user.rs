//! User provisioning command.
//!
//! # Usage
//!
//! ```bash
//! mg-cli user ensure -e shopper@example.com -n "Demo Shopper"
//! ```
//!
//! Provisions an account for an externally-authenticated identity.
//! Idempotent: running it twice (or concurrently) for the same email
//! resolves to the one existing account.

use marigold_storefront::services::auth::AuthService;

use super::{CommandError, connect};

/// Ensure an account exists for the given identity.
///
/// # Errors
///
/// Returns an error for an invalid email or a database failure.
pub async fn ensure(
    email: &str,
    name: &str,
    avatar_url: Option<&str>,
) -> Result<(), CommandError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool)
        .provision_identity(email, name, avatar_url)
        .await
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;

    tracing::info!("Account {} ready (id {}, role {})", email, user.id, user.role);
    Ok(())
}
