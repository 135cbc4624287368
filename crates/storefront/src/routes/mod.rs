//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (pings the database)
//!
//! # Catalog (public)
//! GET  /api/products              - Product listing (filter/sort/paginate)
//! GET  /api/products/{slug}       - Product detail
//! GET  /api/categories            - Category list
//!
//! # Auth (public, rate limited)
//! POST /api/auth/register         - Register with email + password
//! POST /api/auth/login            - Login
//! POST /api/auth/logout           - Logout
//! GET  /api/auth/me               - Permission status for the current user
//!
//! # Cart (authenticated)
//! GET    /api/cart                - Cart contents
//! GET    /api/cart/count          - Item count badge
//! POST   /api/cart/items          - Add a product
//! PATCH  /api/cart/items/{id}     - Set line item quantity
//! DELETE /api/cart/items/{id}     - Remove a line item
//!
//! # Seller (seller tier)
//! GET    /api/seller/products       - Own products, any status
//! POST   /api/seller/products       - Create product
//! PATCH  /api/seller/products/{id}  - Update own product
//! DELETE /api/seller/products/{id}  - Delete own product
//!
//! # Superuser (superuser tier; per-capability checks inside)
//! GET   /api/superuser/users                    - List accounts
//! PATCH /api/superuser/users/{id}/capabilities  - Set capability flags
//! POST  /api/superuser/products/{id}/feature    - Feature/unfeature product
//! GET   /api/superuser/analytics                - Aggregate counts
//!
//! # CEO (CEO level only)
//! POST   /api/ceo/superusers/{id}  - Grant superuser (with tier)
//! DELETE /api/ceo/superusers/{id}  - Revoke superuser
//! ```
//!
//! The route authorization gate wraps all of these; tier enforcement never
//! happens in a handler, only capability refinements do.

pub mod auth;
pub mod cart;
pub mod categories;
pub mod ceo;
pub mod health;
pub mod products;
pub mod seller;
pub mod superuser;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(categories::index))
}

/// Create the auth routes router (rate limited).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(auth_rate_limiter())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add_item))
        .route("/items/{id}", patch(cart::update_item).delete(cart::remove_item))
}

/// Create the seller routes router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(seller::list_products).post(seller::create_product),
        )
        .route(
            "/products/{id}",
            patch(seller::update_product).delete(seller::delete_product),
        )
}

/// Create the superuser routes router.
pub fn superuser_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(superuser::list_users))
        .route(
            "/users/{id}/capabilities",
            patch(superuser::update_capabilities),
        )
        .route("/products/{id}/feature", post(superuser::feature_product))
        .route("/analytics", get(superuser::analytics))
}

/// Create the CEO routes router.
pub fn ceo_routes() -> Router<AppState> {
    Router::new().route(
        "/superusers/{id}",
        post(ceo::grant_superuser).delete(ceo::revoke_superuser),
    )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/products", product_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/auth", auth_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/seller", seller_routes())
        .nest("/api/superuser", superuser_routes())
        .nest("/api/ceo", ceo_routes())
}
