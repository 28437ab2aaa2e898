//! HTTP route handlers for the JSON API.
//!
//! Every endpoint responds with the uniform envelope
//! `{ "response": ..., "errorMessage": ... }`.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/auth/register        - Create a client account
//! POST   /api/auth/login           - Start a session
//! POST   /api/auth/logout          - End the session
//!
//! # Users
//! GET    /api/users/me             - Current account
//! GET    /api/users                - Page accounts (admin)
//! GET    /api/users/count          - Total account count (admin)
//! POST   /api/users                - Create account with role (admin)
//! GET    /api/users/{id}           - Account detail (admin or self)
//! PATCH  /api/users/{id}           - Update name/password (admin or self)
//! DELETE /api/users/{id}           - Delete account and cascade (admin or self)
//!
//! # Catalog
//! GET    /api/products             - Page products (public)
//! GET    /api/products/{id}        - Product detail (public)
//! POST   /api/products             - Add product (personnel)
//! PATCH  /api/products/{id}        - Update product (owner or admin)
//! DELETE /api/products/{id}        - Delete or retire product (owner or admin)
//! GET    /api/categories           - Page categories (public)
//! GET    /api/categories/{id}      - Category detail (public)
//! POST   /api/categories           - Add category (admin)
//! PATCH  /api/categories/{id}      - Update category (admin)
//! DELETE /api/categories/{id}      - Delete category, cascade products (admin)
//!
//! # Cart
//! GET    /api/cart                 - Cart header (size, total)
//! POST   /api/cart                 - Mint a bare cart (admin)
//! DELETE /api/cart                 - Empty the cart, releasing stock
//! GET    /api/cart/items           - Page cart items
//! POST   /api/cart/items           - Add product to cart
//! PATCH  /api/cart/items/{id}      - Set item quantity (0 removes)
//! DELETE /api/cart/items/{id}      - Remove item, releasing stock
//!
//! # Orders
//! POST   /api/orders               - Checkout the cart
//! GET    /api/orders               - Page order history (sweeps deliveries)
//! GET    /api/orders/{id}          - Order detail
//!
//! # Feedback
//! POST   /api/feedback             - Submit feedback form (client, once)
//! GET    /api/feedback             - Own feedback form
//! GET    /api/feedback/all         - Page all forms (admin)
//! ```

pub mod cart;
pub mod categories;
pub mod feedback;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
}

/// Create the user management routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::get_users).post(users::add_user))
        .route("/me", get(users::me))
        .route("/count", get(users::count_users))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::get_products).post(products::add_product))
        .route(
            "/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::get_categories).post(categories::add_category),
        )
        .route(
            "/{id}",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::get_cart)
                .post(cart::create_cart)
                .delete(cart::clear_cart),
        )
        .route("/items", get(cart::get_items).post(cart::add_item))
        .route(
            "/items/{id}",
            delete(cart::remove_item).patch(cart::update_item),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::get_orders).post(orders::create_order))
        .route("/{id}", get(orders::get_order))
}

/// Create the feedback routes router.
pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(feedback::get_own).post(feedback::submit))
        .route("/all", get(feedback::get_forms))
}

/// Assemble the full API router under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .nest("/auth", auth_routes())
            .nest("/users", user_routes())
            .nest("/products", product_routes())
            .nest("/categories", category_routes())
            .nest("/cart", cart_routes())
            .nest("/orders", order_routes())
            .nest("/feedback", feedback_routes()),
    )
}
