//! Route policy classification and authorization decisions.
//!
//! Every request path maps to exactly one [`PolicyClass`] via
//! longest-prefix match over a static table. The `/` entry matches every
//! path, which makes [`classify`] total. Disabled prefixes are a denylist
//! override: they win over any other match and deny every principal,
//! including CEO-level superusers.

use marigold_core::{Role, SuperuserLevel};

use crate::models::User;

/// The authorization tier a request path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyClass {
    /// Open to everyone, including anonymous requests.
    Public,
    /// Any authenticated principal.
    AuthRequired,
    /// Sellers, or any superuser-tier principal.
    SellerRequired,
    /// Any superuser-tier principal.
    SuperuserRequired,
    /// Exactly CEO level.
    CeoRequired,
    /// Permanently retired endpoint; denied for every principal.
    Disabled,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Let the request through to its handler.
    Proceed,
    /// No principal on a route that needs one (401).
    AuthenticationRequired,
    /// Principal present but insufficient, or the route is disabled (403).
    Forbidden(&'static str),
}

/// Retired endpoints that must stay dead. Checked before the policy table;
/// a match here denies unconditionally.
const DISABLED_PREFIXES: &[&str] = &["/api/make-me-ceo", "/api/db-direct"];

/// Path-prefix policy table. Longest matching prefix wins; `/` is the
/// catch-all that keeps classification total.
const ROUTE_POLICY: &[(&str, PolicyClass)] = &[
    ("/", PolicyClass::Public),
    ("/products", PolicyClass::Public),
    ("/categories", PolicyClass::Public),
    ("/auth", PolicyClass::Public),
    ("/health", PolicyClass::Public),
    ("/cart", PolicyClass::AuthRequired),
    ("/account", PolicyClass::AuthRequired),
    ("/seller", PolicyClass::SellerRequired),
    ("/superuser", PolicyClass::SuperuserRequired),
    ("/ceo", PolicyClass::CeoRequired),
    ("/api", PolicyClass::AuthRequired),
    ("/api/products", PolicyClass::Public),
    ("/api/categories", PolicyClass::Public),
    ("/api/auth", PolicyClass::Public),
    ("/api/cart", PolicyClass::AuthRequired),
    ("/api/seller", PolicyClass::SellerRequired),
    ("/api/superuser", PolicyClass::SuperuserRequired),
    ("/api/ceo", PolicyClass::CeoRequired),
];

/// Classify a request path into its policy class.
///
/// Total over all inputs: the `/` table entry matches any path, and any
/// other `/api/*` path falls through to the `/api` entry (authenticated by
/// default). Matching is raw prefix matching, mirroring the original
/// middleware dispatch.
#[must_use]
pub fn classify(path: &str) -> PolicyClass {
    if DISABLED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return PolicyClass::Disabled;
    }

    ROUTE_POLICY
        .iter()
        .filter(|(prefix, _)| path.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map_or(PolicyClass::Public, |(_, class)| *class)
}

/// Decide whether a principal may proceed on a route of the given class.
///
/// Runs before any handler logic. Disabled routes deny before the
/// authentication check so the denial is identical for anonymous and
/// fully-privileged callers.
#[must_use]
pub fn authorize(class: PolicyClass, principal: Option<&User>) -> Decision {
    match class {
        PolicyClass::Disabled => Decision::Forbidden("This endpoint has been disabled"),
        PolicyClass::Public => Decision::Proceed,
        PolicyClass::AuthRequired => {
            principal.map_or(Decision::AuthenticationRequired, |_| Decision::Proceed)
        }
        PolicyClass::SellerRequired => {
            principal.map_or(Decision::AuthenticationRequired, |user| {
                // Sellers, plus anything above them. Superuser tier is gated
                // on the bit alone; the role value is not trusted.
                if user.role == Role::Seller || user.is_superuser {
                    Decision::Proceed
                } else {
                    Decision::Forbidden("Seller account required")
                }
            })
        }
        PolicyClass::SuperuserRequired => {
            principal.map_or(Decision::AuthenticationRequired, |user| {
                if user.is_superuser {
                    Decision::Proceed
                } else {
                    Decision::Forbidden("Superuser access required")
                }
            })
        }
        PolicyClass::CeoRequired => {
            principal.map_or(Decision::AuthenticationRequired, |user| {
                if user.is_superuser && user.superuser_level == Some(SuperuserLevel::Ceo) {
                    Decision::Proceed
                } else {
                    Decision::Forbidden("CEO access required")
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use marigold_core::{CapabilityFlags, Email, UserId};

    fn user(role: Role, is_superuser: bool, level: Option<SuperuserLevel>) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(1),
            email: Email::parse("test@marigoldmarket.dev").expect("valid email"),
            name: "Test".to_string(),
            avatar_url: None,
            role,
            is_superuser,
            superuser_level: level,
            flags: CapabilityFlags::none(),
            seller_verified: false,
            seller_rating: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn buyer() -> User {
        user(Role::Buyer, false, None)
    }

    fn seller() -> User {
        user(Role::Seller, false, None)
    }

    fn superuser() -> User {
        user(Role::Superuser, true, Some(SuperuserLevel::Standard))
    }

    fn ceo() -> User {
        user(Role::Ceo, true, Some(SuperuserLevel::Ceo))
    }

    // =========================================================================
    // classify
    // =========================================================================

    #[test]
    fn test_classify_public_prefixes() {
        assert_eq!(classify("/"), PolicyClass::Public);
        assert_eq!(classify("/products"), PolicyClass::Public);
        assert_eq!(classify("/products/walnut-desk"), PolicyClass::Public);
        assert_eq!(classify("/categories/furniture"), PolicyClass::Public);
        assert_eq!(classify("/auth/login"), PolicyClass::Public);
        assert_eq!(classify("/health/ready"), PolicyClass::Public);
        assert_eq!(classify("/api/products?page=2"), PolicyClass::Public);
        assert_eq!(classify("/api/auth/login"), PolicyClass::Public);
    }

    #[test]
    fn test_classify_longest_prefix_wins_over_api_default() {
        // /api alone is AuthRequired; the more specific prefixes override it
        assert_eq!(classify("/api/orders"), PolicyClass::AuthRequired);
        assert_eq!(classify("/api/products"), PolicyClass::Public);
        assert_eq!(classify("/api/seller/products"), PolicyClass::SellerRequired);
        assert_eq!(
            classify("/api/superuser/users"),
            PolicyClass::SuperuserRequired
        );
        assert_eq!(classify("/api/ceo/superusers/3"), PolicyClass::CeoRequired);
    }

    #[test]
    fn test_classify_page_prefixes() {
        assert_eq!(classify("/cart"), PolicyClass::AuthRequired);
        assert_eq!(classify("/account/orders"), PolicyClass::AuthRequired);
        assert_eq!(classify("/seller/dashboard"), PolicyClass::SellerRequired);
        assert_eq!(classify("/superuser"), PolicyClass::SuperuserRequired);
        assert_eq!(classify("/ceo"), PolicyClass::CeoRequired);
    }

    #[test]
    fn test_classify_unknown_paths_fall_back() {
        // Unknown non-API paths are public pages (they 404 in the router);
        // unknown API paths require authentication
        assert_eq!(classify("/totally-unknown"), PolicyClass::Public);
        assert_eq!(classify("/api/unknown-thing"), PolicyClass::AuthRequired);
    }

    #[test]
    fn test_classify_disabled_overrides_everything() {
        assert_eq!(classify("/api/make-me-ceo"), PolicyClass::Disabled);
        assert_eq!(classify("/api/make-me-ceo/please"), PolicyClass::Disabled);
        assert_eq!(classify("/api/db-direct"), PolicyClass::Disabled);
        assert_eq!(classify("/api/db-direct/query"), PolicyClass::Disabled);
    }

    #[test]
    fn test_classify_is_total_and_single_valued() {
        // A grab-bag of odd inputs; every one must classify
        for path in [
            "",
            "/",
            "//",
            "/API/products",
            "/api",
            "/api/",
            "/favicon.ico",
            "/products/../superuser",
            "/sellers-welcome",
        ] {
            let _ = classify(path);
        }
    }

    // =========================================================================
    // authorize
    // =========================================================================

    #[test]
    fn test_public_allows_anonymous() {
        assert_eq!(authorize(PolicyClass::Public, None), Decision::Proceed);
    }

    #[test]
    fn test_auth_required_denies_anonymous_with_401() {
        assert_eq!(
            authorize(PolicyClass::AuthRequired, None),
            Decision::AuthenticationRequired
        );
    }

    #[test]
    fn test_auth_required_allows_any_principal() {
        assert_eq!(
            authorize(PolicyClass::AuthRequired, Some(&buyer())),
            Decision::Proceed
        );
    }

    #[test]
    fn test_seller_required_accepts_seller_and_above() {
        assert_eq!(
            authorize(PolicyClass::SellerRequired, Some(&seller())),
            Decision::Proceed
        );
        assert_eq!(
            authorize(PolicyClass::SellerRequired, Some(&superuser())),
            Decision::Proceed
        );
        assert_eq!(
            authorize(PolicyClass::SellerRequired, Some(&ceo())),
            Decision::Proceed
        );
        assert!(matches!(
            authorize(PolicyClass::SellerRequired, Some(&buyer())),
            Decision::Forbidden(_)
        ));
    }

    #[test]
    fn test_superuser_required_gates_on_the_bit_not_the_role() {
        assert_eq!(
            authorize(PolicyClass::SuperuserRequired, Some(&superuser())),
            Decision::Proceed
        );
        // role says CEO but the bit is off - no privilege
        let impostor = user(Role::Ceo, false, Some(SuperuserLevel::Ceo));
        assert!(matches!(
            authorize(PolicyClass::SuperuserRequired, Some(&impostor)),
            Decision::Forbidden(_)
        ));
    }

    #[test]
    fn test_ceo_required_accepts_only_ceo_level() {
        assert_eq!(
            authorize(PolicyClass::CeoRequired, Some(&ceo())),
            Decision::Proceed
        );
        assert!(matches!(
            authorize(PolicyClass::CeoRequired, Some(&superuser())),
            Decision::Forbidden(_)
        ));
        assert!(matches!(
            authorize(PolicyClass::CeoRequired, Some(&buyer())),
            Decision::Forbidden(_)
        ));
    }

    #[test]
    fn test_disabled_denies_everyone_identically() {
        let anonymous = authorize(PolicyClass::Disabled, None);
        let as_ceo = authorize(PolicyClass::Disabled, Some(&ceo()));
        assert_eq!(anonymous, as_ceo);
        assert!(matches!(anonymous, Decision::Forbidden(_)));
    }

    #[test]
    fn test_make_me_ceo_denied_for_ceo_same_as_anonymous() {
        let class = classify("/api/make-me-ceo");
        assert_eq!(
            authorize(class, Some(&ceo())),
            authorize(class, None)
        );
    }
}
