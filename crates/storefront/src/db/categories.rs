//! Category repository.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use marigold_core::CategoryId;

use super::RepositoryError;
use crate::models::Category;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query("SELECT id, slug, name FROM categories ORDER BY name")
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(map_category).collect()
    }

    /// Get a category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query("SELECT id, slug, name FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(map_category).transpose()
    }
}

fn map_category(row: &PgRow) -> Result<Category, RepositoryError> {
    Ok(Category {
        id: CategoryId::new(row.try_get("id")?),
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
    })
}
