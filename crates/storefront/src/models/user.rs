//! User domain types.

use chrono::{DateTime, Utc};

use marigold_core::{CapabilityFlags, Email, Role, SuperuserLevel, UserId};

/// A Marigold user - the authenticated principal for every privileged
/// operation.
///
/// Privilege state is deliberately redundant in storage (`role`,
/// `is_superuser`, `superuser_level`, capability flags); the permission
/// model in [`crate::authz`] is the only component that interprets it.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Avatar URL from the identity provider, if any.
    pub avatar_url: Option<String>,
    /// Base role.
    pub role: Role,
    /// Superuser bit. The sole gate for superuser-tier privilege.
    pub is_superuser: bool,
    /// Tier within the superuser population, if any.
    pub superuser_level: Option<SuperuserLevel>,
    /// Stored capability flags (only meaningful while `is_superuser` is set).
    pub flags: CapabilityFlags,
    /// Seller verification badge.
    pub seller_verified: bool,
    /// Aggregate seller rating (0-5), if the user has sold anything.
    pub seller_rating: Option<f64>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
