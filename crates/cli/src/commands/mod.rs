//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod superuser;
pub mod user;

use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid argument.
    #[error("{0}")]
    InvalidArgument(String),

    /// Referenced entity was not found.
    #[error("{0}")]
    NotFound(String),
}

/// Connect to the Marigold database using `MARIGOLD_DATABASE_URL`
/// (falling back to `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MARIGOLD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("MARIGOLD_DATABASE_URL"))?;

    Ok(PgPool::connect(&database_url).await?)
}
