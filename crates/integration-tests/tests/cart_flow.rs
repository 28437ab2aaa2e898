//! Integration tests for cart operations and stock reservation.
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
    any_category_id, base_url, create_product, fresh_client_account, staff_account,
    unwrap_response,
};

async fn get_cart(client: &Client) -> Value {
    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    unwrap_response(resp.json().await.expect("body"))
}

async fn get_product(client: &Client, product_id: i64) -> Value {
    let resp = client
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    unwrap_response(resp.json().await.expect("body"))
}

async fn add_item(client: &Client, product_id: i64, quantity: i32) -> reqwest::Response {
    client
        .post(format!("{}/api/cart/items", base_url()))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
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

/// A fresh product created by the seeded personnel account, so the tests
/// never fight each other over stock.
async fn fresh_product(price: &str, stock: i32) -> Value {
    let (staff, _) = staff_account().await;
    let category_id = any_category_id(&staff).await;
    create_product(&staff, category_id, price, stock).await
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_add_item_reserves_stock() {
    let product = fresh_product("10.00", 5).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("cart-add").await;
    let resp = add_item(&http, product_id, 2).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let cart = get_cart(&http).await;
    assert_eq!(cart["size"], 2);
    assert!((price(&cart["totalPrice"]) - 20.0).abs() < 1e-9);

    let product = get_product(&http, product_id).await;
    assert_eq!(product["stock"], 3);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_add_same_product_merges_quantities() {
    let product = fresh_product("4.50", 10).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("cart-merge").await;
    assert_eq!(add_item(&http, product_id, 1).await.status(), StatusCode::CREATED);
    assert_eq!(add_item(&http, product_id, 2).await.status(), StatusCode::CREATED);

    let resp = http
        .get(format!("{}/api/cart/items", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = unwrap_response(resp.json().await.expect("body"));
    let items = page["data"].as_array().expect("items array");
    assert_eq!(items.len(), 1, "same product merges into one line");
    assert_eq!(items[0]["quantity"], 3);
    assert!((price(&items[0]["price"]) - 13.5).abs() < 1e-9);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_add_item_rejects_insufficient_stock() {
    let product = fresh_product("10.00", 2).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("cart-overdraw").await;
    let resp = add_item(&http, product_id, 3).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing was reserved
    let product = get_product(&http, product_id).await;
    assert_eq!(product["stock"], 2);
    assert_eq!(get_cart(&http).await["size"], 0);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_add_item_rejects_quantity_overflow() {
    let product = fresh_product("1.00", 5).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("cart-overflow").await;
    assert_eq!(add_item(&http, product_id, 1).await.status(), StatusCode::CREATED);

    // Merging with an absurd quantity must reject, not wrap
    let resp = add_item(&http, product_id, i32::MAX).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(get_product(&http, product_id).await["stock"], 4);
    assert_eq!(get_cart(&http).await["size"], 1);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_update_item_quantity() {
    let product = fresh_product("5.00", 10).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("cart-update").await;
    assert_eq!(add_item(&http, product_id, 3).await.status(), StatusCode::CREATED);
    assert_eq!(get_product(&http, product_id).await["stock"], 7);
    let cart = get_cart(&http).await;
    assert_eq!(cart["size"], 3);
    assert!((price(&cart["totalPrice"]) - 15.0).abs() < 1e-9);

    let resp = http
        .get(format!("{}/api/cart/items", base_url()))
        .send()
        .await
        .expect("request failed");
    let page = unwrap_response(resp.json().await.expect("body"));
    let item_id = page["data"][0]["id"].as_i64().expect("item id");

    // Raise to 5: two more units reserved
    let resp = http
        .patch(format!("{}/api/cart/items/{item_id}", base_url()))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(get_product(&http, product_id).await["stock"], 5);
    let cart = get_cart(&http).await;
    assert_eq!(cart["size"], 5);
    assert!((price(&cart["totalPrice"]) - 25.0).abs() < 1e-9);

    // Raising past the remaining stock fails
    let resp = http
        .patch(format!("{}/api/cart/items/{item_id}", base_url()))
        .json(&json!({ "quantity": 11 }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Zero quantity removes the line and restores stock
    let resp = http
        .patch(format!("{}/api/cart/items/{item_id}", base_url()))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(get_product(&http, product_id).await["stock"], 10);
    assert_eq!(get_cart(&http).await["size"], 0);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_remove_item_restores_stock() {
    let product = fresh_product("7.25", 4).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("cart-remove").await;
    assert_eq!(add_item(&http, product_id, 4).await.status(), StatusCode::CREATED);
    assert_eq!(get_product(&http, product_id).await["stock"], 0);

    let resp = http
        .get(format!("{}/api/cart/items", base_url()))
        .send()
        .await
        .expect("request failed");
    let page = unwrap_response(resp.json().await.expect("body"));
    let item_id = page["data"][0]["id"].as_i64().expect("item id");

    let resp = http
        .delete(format!("{}/api/cart/items/{item_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(get_product(&http, product_id).await["stock"], 4);
    let cart = get_cart(&http).await;
    assert_eq!(cart["size"], 0);
    assert!(price(&cart["totalPrice"]).abs() < 1e-9);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_clear_cart_restores_all_stock() {
    let first = fresh_product("3.00", 6).await;
    let second = fresh_product("9.99", 2).await;
    let first_id = first["id"].as_i64().expect("product id");
    let second_id = second["id"].as_i64().expect("product id");

    let (http, _user) = fresh_client_account("cart-clear").await;
    assert_eq!(add_item(&http, first_id, 3).await.status(), StatusCode::CREATED);
    assert_eq!(add_item(&http, second_id, 2).await.status(), StatusCode::CREATED);

    let resp = http
        .delete(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(get_cart(&http).await["size"], 0);
    assert_eq!(get_product(&http, first_id).await["stock"], 6);
    assert_eq!(get_product(&http, second_id).await["stock"], 2);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_cannot_touch_foreign_cart_item() {
    let product = fresh_product("2.00", 5).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (owner, _user) = fresh_client_account("cart-owner").await;
    assert_eq!(add_item(&owner, product_id, 1).await.status(), StatusCode::CREATED);

    let resp = owner
        .get(format!("{}/api/cart/items", base_url()))
        .send()
        .await
        .expect("request failed");
    let page = unwrap_response(resp.json().await.expect("body"));
    let item_id = page["data"][0]["id"].as_i64().expect("item id");

    let (intruder, _user) = fresh_client_account("cart-intruder").await;
    let resp = intruder
        .patch(format!("{}/api/cart/items/{item_id}", base_url()))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = intruder
        .delete(format!("{}/api/cart/items/{item_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_cart_requires_session() {
    let http = clementine_integration_tests::client();
    let resp = http
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
