//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a product.
///
/// Only [`ProductStatus::Active`] products are ever visible on the public
/// catalog, regardless of any other listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Being drafted by its seller; not publicly visible.
    #[default]
    Draft,
    /// Published and eligible for listings.
    Active,
    /// Retired; kept for order history, never listed.
    Archived,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ProductStatus::Draft,
            ProductStatus::Active,
            ProductStatus::Archived,
        ] {
            let parsed = ProductStatus::from_str(&status.to_string()).expect("roundtrip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ProductStatus::Active).expect("serialize");
        assert_eq!(json, "\"active\"");
    }
}
