//! Capability derivation for principals.
//!
//! Stored capability flags are inputs, not answers: a flag only grants
//! anything while the account's superuser bit is set, and a CEO-level
//! account holds every capability no matter what its flags say. Derivation
//! happens on every authorization decision - the result is never cached or
//! persisted, so demotions and flag edits take effect on the next request.

use serde::Serialize;

use marigold_core::SuperuserLevel;

use crate::models::User;

/// The effective capability set for a principal.
///
/// Derived, never stored. Serializes with camelCase keys for the
/// permission-status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub create_products: bool,
    pub moderate_content: bool,
    pub view_analytics: bool,
    pub manage_users: bool,
    pub feature_products: bool,
}

impl Permissions {
    /// Every capability granted.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            create_products: true,
            moderate_content: true,
            view_analytics: true,
            manage_users: true,
            feature_products: true,
        }
    }

    /// Every capability denied.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            create_products: false,
            moderate_content: false,
            view_analytics: false,
            manage_users: false,
            feature_products: false,
        }
    }

    /// Derive the effective capability set for a user.
    ///
    /// Rules, in order:
    ///
    /// 1. Without the superuser bit, every capability is false - stored
    ///    flags left over from a demotion grant nothing.
    /// 2. CEO level implies every capability, even if individual flags are
    ///    false.
    /// 3. Otherwise each capability equals its stored flag verbatim.
    #[must_use]
    pub const fn derive(user: &User) -> Self {
        if !user.is_superuser {
            return Self::none();
        }

        if matches!(user.superuser_level, Some(SuperuserLevel::Ceo)) {
            return Self::all();
        }

        Self {
            create_products: user.flags.create_products,
            moderate_content: user.flags.moderate_content,
            view_analytics: user.flags.view_analytics,
            manage_users: user.flags.manage_users,
            feature_products: user.flags.feature_products,
        }
    }
}
