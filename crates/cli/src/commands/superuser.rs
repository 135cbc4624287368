//! Superuser management commands.
//!
//! # Usage
//!
//! ```bash
//! mg-cli superuser grant -e ops@example.com
//! mg-cli superuser grant -e ceo@example.com -l ceo
//! mg-cli superuser revoke -e former-ops@example.com
//! ```
//!
//! Granting only flips the superuser bit and tier; capability flags are
//! edited through the backoffice API by a superuser with `manage_users`.

use marigold_core::SuperuserLevel;

use super::{CommandError, connect};

/// Grant superuser status to an existing account.
///
/// # Errors
///
/// Returns an error for an unknown level, a missing account, or a
/// database failure.
pub async fn grant(email: &str, level: &str) -> Result<(), CommandError> {
    let level: SuperuserLevel = level.parse().map_err(|_| {
        CommandError::InvalidArgument(format!(
            "Invalid level: {level}. Valid levels: standard, ceo"
        ))
    })?;

    let pool = connect().await?;

    let result = sqlx::query(
        "UPDATE users
         SET is_superuser = TRUE, superuser_level = $1, updated_at = now()
         WHERE email = $2",
    )
    .bind(level)
    .bind(email)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CommandError::NotFound(format!(
            "No account with email: {email}"
        )));
    }

    tracing::info!("Granted {level} superuser to {email}");
    Ok(())
}

/// Revoke superuser status from an account.
///
/// Capability flags are left in place; they grant nothing without the bit.
///
/// # Errors
///
/// Returns an error for a missing account or a database failure.
pub async fn revoke(email: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let result = sqlx::query(
        "UPDATE users
         SET is_superuser = FALSE, superuser_level = NULL, updated_at = now()
         WHERE email = $1",
    )
    .bind(email)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CommandError::NotFound(format!(
            "No account with email: {email}"
        )));
    }

    tracing::info!("Revoked superuser from {email}");
    Ok(())
}
