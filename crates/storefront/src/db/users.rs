//! User repository for database operations.
//!
//! Accounts, password hashes, and the privilege columns consumed by the
//! permission model. Queries use the runtime sqlx API with explicit row
//! mapping.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use marigold_core::{CapabilityFlags, Email, Role, SuperuserLevel, UserId};

use super::RepositoryError;
use crate::models::User;

/// Column list shared by every user SELECT.
const USER_COLUMNS: &str = "id, email, name, avatar_url, role, is_superuser, superuser_level, \
     can_create_products, can_moderate_content, can_view_analytics, \
     can_manage_users, can_feature_products, seller_verified, seller_rating, \
     created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Provision a user on first sight of an authenticated identity.
    ///
    /// New accounts get the default buyer role with no privilege bits set.
    /// Concurrent provisioning for the same email is resolved by the unique
    /// email constraint: a conflict means the account already exists, and
    /// the existing row is fetched instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert or re-fetch fails.
    /// Returns `RepositoryError::DataCorruption` if a row holds an invalid email.
    pub async fn find_or_create(
        &self,
        email: &Email,
        name: &str,
        avatar_url: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let inserted = sqlx::query(&format!(
            "INSERT INTO users (email, name, avatar_url)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO NOTHING
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(avatar_url)
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = inserted {
            return map_user(&row);
        }

        // Lost the race (or the account predates this call): re-fetch.
        self.get_by_email(email)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Create a new user with email, name, and password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "INSERT INTO users (email, name)
             VALUES ($1, $2)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let user = map_user(&row)?;

        sqlx::query(
            "INSERT INTO user_passwords (user_id, password_hash)
             VALUES ($1, $2)",
        )
        .bind(user.id.as_i32())
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, \
                    (SELECT p.password_hash FROM user_passwords p WHERE p.user_id = users.id) \
                    AS password_hash
             FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Some(password_hash) = row.try_get::<Option<String>, _>("password_hash")? else {
            return Ok(None);
        };

        Ok(Some((map_user(&row)?, password_hash)))
    }

    /// List users, newest first, with the total account count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, page: u32, limit: u32) -> Result<(Vec<User>, u64), RepositoryError> {
        let offset = (i64::from(page) - 1) * i64::from(limit);

        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let users = rows.iter().map(map_user).collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        Ok((users, total.try_into().unwrap_or(0)))
    }

    /// Replace a user's stored capability flags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_flags(
        &self,
        user_id: UserId,
        flags: CapabilityFlags,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users
             SET can_create_products = $1,
                 can_moderate_content = $2,
                 can_view_analytics = $3,
                 can_manage_users = $4,
                 can_feature_products = $5,
                 updated_at = now()
             WHERE id = $6",
        )
        .bind(flags.create_products)
        .bind(flags.moderate_content)
        .bind(flags.view_analytics)
        .bind(flags.manage_users)
        .bind(flags.feature_products)
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set a user's superuser bit and tier. Revoking clears the tier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_superuser(
        &self,
        user_id: UserId,
        is_superuser: bool,
        level: Option<SuperuserLevel>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users
             SET is_superuser = $1, superuser_level = $2, updated_at = now()
             WHERE id = $3",
        )
        .bind(is_superuser)
        .bind(level)
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Map a user row into the domain type.
fn map_user(row: &PgRow) -> Result<User, RepositoryError> {
    let raw_email: String = row.try_get("email")?;
    let email = Email::parse(&raw_email).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
    })?;

    let role: Role = row.try_get("role")?;
    let superuser_level: Option<SuperuserLevel> = row.try_get("superuser_level")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(User {
        id: UserId::new(row.try_get("id")?),
        email,
        name: row.try_get("name")?,
        avatar_url: row.try_get("avatar_url")?,
        role,
        is_superuser: row.try_get("is_superuser")?,
        superuser_level,
        flags: CapabilityFlags {
            create_products: row.try_get("can_create_products")?,
            moderate_content: row.try_get("can_moderate_content")?,
            view_analytics: row.try_get("can_view_analytics")?,
            manage_users: row.try_get("can_manage_users")?,
            feature_products: row.try_get("can_feature_products")?,
        },
        seller_verified: row.try_get("seller_verified")?,
        seller_rating: row.try_get("seller_rating")?,
        created_at,
        updated_at,
    })
}
