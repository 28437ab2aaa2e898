//! Integration tests for checkout and order retrieval.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - A seeded database (cargo run -p clementine-cli -- seed)
//! - The server running (cargo run -p clementine-server)
//!
//! Run with: cargo test -p clementine-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use clementine_integration_tests::{
    any_category_id, backdate_delivery, base_url, create_product, db_pool, fresh_client_account,
    order_updated_at, staff_account, unwrap_response,
};

async fn add_item(client: &Client, product_id: i64, quantity: i32) {
    let resp = client
        .post(format!("{}/api/cart/items", base_url()))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
}

async fn checkout(client: &Client, phone_number: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/orders", base_url()))
        .json(&json!({
            "shippingAddress": "1 Integration Way, Testville",
            "phoneNumber": phone_number,
        }))
        .send()
        .await
        .expect("request failed")
}

fn price(value: &Value) -> f64 {
    value
        .as_str()
        .expect("price is a decimal string")
        .parse()
        .expect("price parses")
}

async fn fresh_product(price: &str, stock: i32) -> Value {
    let (staff, _) = staff_account().await;
    let category_id = any_category_id(&staff).await;
    create_product(&staff, category_id, price, stock).await
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_checkout_snapshots_cart() {
    let product = fresh_product("12.50", 8).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("order-checkout").await;
    add_item(&http, product_id, 2).await;

    let resp = checkout(&http, "0123456789").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = unwrap_response(resp.json().await.expect("body"));

    assert_eq!(order["status"], "pending");
    assert_eq!(order["phoneNumber"], "0123456789");
    assert!((price(&order["total"]) - 25.0).abs() < 1e-9);
    let items = order["orderItems"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], product_id);
    assert_eq!(items[0]["quantity"], 2);

    // The cart is emptied without restoring stock
    let resp = http
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("request failed");
    let cart = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(cart["size"], 0);

    let resp = http
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    let product = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(product["stock"], 6, "bought units stay sold");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_checkout_rejects_empty_cart() {
    let (http, _user) = fresh_client_account("order-empty").await;
    let resp = checkout(&http, "0123456789").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_checkout_rejects_bad_phone_number() {
    let product = fresh_product("1.00", 3).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("order-phone").await;
    add_item(&http, product_id, 1).await;

    for bad in ["12345", "01234567890", "01234abcde", "+40123456789"] {
        let resp = checkout(&http, bad).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "phone {bad:?}");
    }

    // Cart untouched by the failed attempts
    let resp = http
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("request failed");
    let cart = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(cart["size"], 1);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_order_listing_and_lookup() {
    let product = fresh_product("6.00", 10).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("order-list").await;
    add_item(&http, product_id, 1).await;
    let resp = checkout(&http, "0712345678").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = unwrap_response(resp.json().await.expect("body"));
    let order_id = order["id"].as_i64().expect("order id");

    let resp = http
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(page["totalCount"], 1);
    assert_eq!(page["data"][0]["id"], order_id);

    let resp = http
        .get(format!("{}/api/orders/{order_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(fetched["id"], order_id);
    assert_eq!(fetched["orderItems"].as_array().expect("items").len(), 1);
}

#[tokio::test]
#[ignore = "Requires running server, seeded database and database credentials"]
async fn test_overdue_orders_flip_to_delivered_once() {
    let product = fresh_product("2.00", 4).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("order-sweep").await;
    add_item(&http, product_id, 1).await;
    let resp = checkout(&http, "0712345678").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(order["status"], "pending");
    let order_id = order["id"].as_i64().expect("order id");

    let db = db_pool().await;
    backdate_delivery(&db, order_id).await;

    // The first listing flips the overdue order
    let resp = http
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(page["data"][0]["status"], "delivered");
    let stamped = order_updated_at(&db, order_id).await;

    // The second is a no-op: the stamp does not move again
    let resp = http
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(page["data"][0]["status"], "delivered");
    assert_eq!(order_updated_at(&db, order_id).await, stamped);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_cannot_read_foreign_order() {
    let product = fresh_product("6.00", 5).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (owner, _user) = fresh_client_account("order-owner").await;
    add_item(&owner, product_id, 1).await;
    let resp = checkout(&owner, "0712345678").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = unwrap_response(resp.json().await.expect("body"));
    let order_id = order["id"].as_i64().expect("order id");

    let (intruder, _user) = fresh_client_account("order-intruder").await;
    let resp = intruder
        .get(format!("{}/api/orders/{order_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // And the intruder's own listing stays empty
    let resp = intruder
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await
        .expect("request failed");
    let page = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(page["totalCount"], 0);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_orders_require_session() {
    let http = clementine_integration_tests::client();
    let resp = http
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
