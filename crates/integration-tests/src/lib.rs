//! Integration test helpers for Clementine.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p clementine-cli -- migrate
//! cargo run -p clementine-cli -- seed
//!
//! # Start the server
//! cargo run -p clementine-server
//!
//! # Run integration tests
//! cargo test -p clementine-integration-tests -- --ignored
//! ```
//!
//! Tests use fresh throwaway accounts where possible. The catalog tests
//! additionally rely on the seeded personnel account
//! (`staff@clementine.shop`) and, for admin-only endpoints, on credentials
//! given via `CLEMENTINE_ADMIN_EMAIL` / `CLEMENTINE_ADMIN_PASSWORD`.

use reqwest::Client;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Seeded personnel account email (created by `clementine seed`).
pub const STAFF_EMAIL: &str = "staff@clementine.shop";
/// Seeded personnel account password.
pub const STAFF_PASSWORD: &str = "staff-demo-only";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CLEMENTINE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Build an HTTP client with a cookie store for session handling.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email address.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.clementine.shop", Uuid::new_v4().simple())
}

/// Register a client account. Returns the user payload from the envelope.
///
/// # Panics
///
/// Panics if the request fails or the response is not a success envelope.
pub async fn register(client: &Client, email: &str, password: &str) -> Value {
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": email,
            "name": "Test User",
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), 201, "registration should succeed");
    unwrap_response(resp.json().await.expect("Failed to parse body"))
}

/// Log in, binding the session cookie to the client.
///
/// # Panics
///
/// Panics if the request fails or the credentials are rejected.
pub async fn login(client: &Client, email: &str, password: &str) -> Value {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), 200, "login should succeed");
    unwrap_response(resp.json().await.expect("Failed to parse body"))
}

/// Register a fresh client account and log it in.
///
/// # Panics
///
/// Panics if registration or login fails.
pub async fn fresh_client_account(prefix: &str) -> (Client, Value) {
    let client = client();
    let email = unique_email(prefix);
    register(&client, &email, "integration-pass").await;
    let user = login(&client, &email, "integration-pass").await;
    (client, user)
}

/// Log in as the seeded personnel account.
///
/// # Panics
///
/// Panics if the seeded account is missing.
pub async fn staff_account() -> (Client, Value) {
    let client = client();
    let user = login(&client, STAFF_EMAIL, STAFF_PASSWORD).await;
    (client, user)
}

/// Log in with the admin credentials from the environment, if set.
pub async fn admin_account() -> Option<(Client, Value)> {
    let email = std::env::var("CLEMENTINE_ADMIN_EMAIL").ok()?;
    let password = std::env::var("CLEMENTINE_ADMIN_PASSWORD").ok()?;

    let client = client();
    let user = login(&client, &email, &password).await;
    Some((client, user))
}

/// Connect straight to the test database, for fixtures the API cannot set
/// up (e.g. backdating timestamps).
///
/// # Panics
///
/// Panics if neither `CLEMENTINE_DATABASE_URL` nor `DATABASE_URL` is set,
/// or the connection fails.
pub async fn db_pool() -> PgPool {
    let url = std::env::var("CLEMENTINE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CLEMENTINE_DATABASE_URL or DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to the test database")
}

/// Move an order's promised delivery date into the past.
///
/// # Panics
///
/// Panics if the order does not exist.
pub async fn backdate_delivery(pool: &PgPool, order_id: i64) {
    let result = sqlx::query("UPDATE orders SET delivery_date = now() - interval '1 day' WHERE id = $1")
        .bind(order_id)
        .execute(pool)
        .await
        .expect("Failed to backdate delivery date");
    assert_eq!(result.rows_affected(), 1, "order {order_id} should exist");
}

/// Read an order's raw `updated_at` stamp.
///
/// # Panics
///
/// Panics if the order does not exist.
pub async fn order_updated_at(pool: &PgPool, order_id: i64) -> String {
    sqlx::query_scalar::<_, String>("SELECT updated_at::text FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read order stamp")
}

/// Extract the `response` payload from the success envelope.
///
/// # Panics
///
/// Panics if the envelope carries an `errorMessage` instead.
#[must_use]
pub fn unwrap_response(envelope: Value) -> Value {
    assert!(
        envelope.get("errorMessage").is_none(),
        "expected success envelope, got: {envelope}"
    );
    envelope
        .get("response")
        .cloned()
        .unwrap_or(Value::Null)
}

/// Create a product as the given (personnel) client. Returns its payload.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(client: &Client, category_id: i64, price: &str, stock: i32) -> Value {
    let name = format!("Test Product {}", Uuid::new_v4().simple());
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": name,
            "description": "integration test product",
            "price": price,
            "stock": stock,
            "size": 42,
            "color": "orange",
            "categoryId": category_id,
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), 201, "product creation should succeed");
    unwrap_response(resp.json().await.expect("Failed to parse body"))
}

/// Fetch the first category ID from the seeded catalog.
///
/// # Panics
///
/// Panics if no categories exist (run `clementine seed` first).
pub async fn any_category_id(client: &Client) -> i64 {
    let resp = client
        .get(format!("{}/api/categories", base_url()))
        .send()
        .await
        .expect("Failed to list categories");

    assert_eq!(resp.status(), 200);
    let page = unwrap_response(resp.json().await.expect("Failed to parse body"));
    page["data"][0]["id"]
        .as_i64()
        .expect("seeded catalog should have a category")
}
