//! HTTP route handlers for the marketplace.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (featured products + categories)
//! GET  /health                  - Health check
//!
//! # Catalog (public)
//! GET  /categories              - All categories with their products
//! GET  /categories/{slug}       - One category page
//! GET  /products/{id}           - Product detail
//! GET  /search?q=               - Title search
//!
//! # Auth
//! POST /login                   - Login action (redirects to role dashboard)
//! POST /register                - Register action
//! POST /logout                  - Logout action
//!
//! # Account (requires auth)
//! GET  /account                 - Resolved profile
//! GET  /api/me                  - Resolved profile (API shape)
//!
//! # Customer dashboard (requires customer role)
//! GET  /customer                - Dashboard
//! GET  /customer/orders         - Order history
//! POST /customer/orders         - Place an order
//!
//! # Farmer dashboard (requires farmer role)
//! GET  /farmer                  - Dashboard
//! GET  /farmer/products         - Own product listings
//! POST /farmer/products         - Create product (multipart)
//! POST /farmer/products/{id}    - Update product (multipart)
//! POST /farmer/products/{id}/delete - Delete product
//! GET  /farmer/orders           - Incoming orders
//! POST /farmer/payment-link     - Set payment-collection link
//!
//! # Admin dashboard (requires admin role)
//! GET  /admin                   - Dashboard counts
//! GET  /admin/users             - All user profiles
//! POST /admin/users/{id}/delete - Delete a profile
//! POST /admin/categories        - Create a category
//!
//! # Payments API (requires customer role)
//! POST /api/payments/checkout   - Create gateway order, return widget options
//! POST /api/payments/verify     - Forward widget receipt to verification
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod payment;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the public catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::index))
        .route("/categories/{slug}", get(catalog::show))
        .route("/products/{id}", get(catalog::product_detail))
        .route("/search", get(catalog::search))
}

/// Create the customer dashboard router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::dashboard))
        .route("/orders", get(orders::my_orders).post(orders::place))
}

/// Create the farmer dashboard router.
pub fn farmer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::dashboard))
        .route("/products", get(products::my_products).post(products::create))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/delete", post(products::delete))
        .route("/orders", get(orders::farmer_orders))
        .route("/payment-link", post(account::set_payment_link))
}

/// Create the admin dashboard router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/users", get(admin::list_users))
        .route("/users/{id}/delete", post(admin::delete_user))
        .route("/categories", post(admin::create_category))
}

/// Create the payments API router.
pub fn payment_api_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(payment::checkout))
        .route("/verify", post(payment::verify))
}

/// Create all routes for the marketplace.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(catalog::home))
        // Public catalog
        .merge(catalog_routes())
        // Auth actions
        .merge(auth_routes())
        // Account
        .route("/account", get(account::show))
        .route("/api/me", get(account::show))
        // Role dashboards
        .nest("/customer", customer_routes())
        .nest("/farmer", farmer_routes())
        .nest("/admin", admin_routes())
        // Payments API
        .nest("/api/payments", payment_api_routes())
}
