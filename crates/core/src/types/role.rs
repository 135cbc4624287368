//! Roles, superuser tiers, and stored capability flags.
//!
//! A user carries three privilege-related pieces of state:
//!
//! - [`Role`] - the base role assigned at account creation or by management
//!   actions
//! - a superuser bit plus optional [`SuperuserLevel`] tier
//! - [`CapabilityFlags`] - stored booleans that refine what a superuser may do
//!
//! The stored flags are inputs only. What a request may actually do is
//! derived per request by the permission model in the storefront crate;
//! nothing here performs I/O.

use serde::{Deserialize, Serialize};

/// Base role for a user account.
///
/// New accounts are provisioned as [`Role::Buyer`]. The superuser-tier
/// variants exist because legacy records carry them, but privilege gating
/// keys off the superuser bit, not the role value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can browse the catalog and manage their own cart.
    #[default]
    Buyer,
    /// Can additionally list and manage their own products.
    Seller,
    /// Store staff.
    Admin,
    /// Superuser-tier account.
    Superuser,
    /// Chief executive tier.
    Ceo,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
            Self::Admin => write!(f, "admin"),
            Self::Superuser => write!(f, "superuser"),
            Self::Ceo => write!(f, "ceo"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            "superuser" => Ok(Self::Superuser),
            "ceo" => Ok(Self::Ceo),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Tier within the superuser population.
///
/// Stored as a nullable column; `None` means the account is not tiered
/// (or not a superuser at all - the bit is tracked separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "superuser_level", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum SuperuserLevel {
    /// Ordinary superuser; capabilities come from the stored flags.
    Standard,
    /// Chief executive; overrides every capability flag.
    Ceo,
}

impl std::fmt::Display for SuperuserLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Ceo => write!(f, "ceo"),
        }
    }
}

impl std::str::FromStr for SuperuserLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "ceo" => Ok(Self::Ceo),
            _ => Err(format!("invalid superuser level: {s}")),
        }
    }
}

/// Stored capability flags for a superuser account.
///
/// These are persisted as individual boolean columns and are meaningless on
/// their own: a flag only takes effect once the permission model confirms
/// the superuser bit (a demoted account can keep stale flags without
/// retaining any privilege).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityFlags {
    /// May create products outside the seller surface.
    pub create_products: bool,
    /// May moderate product content.
    pub moderate_content: bool,
    /// May view store analytics.
    pub view_analytics: bool,
    /// May manage user accounts and their flags.
    pub manage_users: bool,
    /// May feature products on the storefront.
    pub feature_products: bool,
}

impl CapabilityFlags {
    /// Flags with every capability granted.
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

    /// Flags with every capability denied.
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_default_is_buyer() {
        assert_eq!(Role::default(), Role::Buyer);
    }

    #[test]
    fn test_role_display_roundtrip() {
        for role in [
            Role::Buyer,
            Role::Seller,
            Role::Admin,
            Role::Superuser,
            Role::Ceo,
        ] {
            let parsed = Role::from_str(&role.to_string()).expect("roundtrip");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_from_str_invalid() {
        assert!(Role::from_str("wizard").is_err());
    }

    #[test]
    fn test_superuser_level_roundtrip() {
        for level in [SuperuserLevel::Standard, SuperuserLevel::Ceo] {
            let parsed = SuperuserLevel::from_str(&level.to_string()).expect("roundtrip");
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn test_capability_flags_all_none() {
        assert!(CapabilityFlags::all().manage_users);
        assert!(!CapabilityFlags::none().manage_users);
        assert_eq!(CapabilityFlags::default(), CapabilityFlags::none());
    }

    #[test]
    fn test_capability_flags_serialize_camel_case() {
        let json = serde_json::to_value(CapabilityFlags::all()).expect("serialize");
        assert_eq!(json["createProducts"], true);
        assert_eq!(json["featureProducts"], true);
    }
}
