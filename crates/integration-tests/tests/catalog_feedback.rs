//! Integration tests for catalog management and feedback forms.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - A seeded database (cargo run -p clementine-cli -- seed)
//! - The server running (cargo run -p clementine-server)
//!
//! The admin-only cases are skipped unless `CLEMENTINE_ADMIN_EMAIL` and
//! `CLEMENTINE_ADMIN_PASSWORD` point at an existing admin account
//! (cargo run -p clementine-cli -- admin create ...).
//!
//! Run with: cargo test -p clementine-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use clementine_integration_tests::{
    admin_account, any_category_id, base_url, create_product, fresh_client_account, staff_account,
    unwrap_response,
};

// --- products ---

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_product_listing_is_public() {
    let http = clementine_integration_tests::client();
    let resp = http
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = unwrap_response(resp.json().await.expect("body"));
    assert!(page["data"].is_array());
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_product_search_matches_literally() {
    let (staff, _) = staff_account().await;
    let category_id = any_category_id(&staff).await;
    let product = create_product(&staff, category_id, "5.00", 1).await;
    let name = product["name"].as_str().expect("product name");

    // A wildcard search term is not a match-everything pattern
    let http = clementine_integration_tests::client();
    let resp = http
        .get(format!("{}/api/products", base_url()))
        .query(&[("search", "%")])
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(page["totalCount"], 0, "no product name contains a literal %");

    // While a plain term still matches its product
    let resp = http
        .get(format!("{}/api/products", base_url()))
        .query(&[("search", name)])
        .send()
        .await
        .expect("request failed");
    let page = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(page["totalCount"], 1);
    assert_eq!(page["data"][0]["name"], name);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_clients_cannot_add_products() {
    let (http, _user) = fresh_client_account("catalog-client").await;
    let resp = http
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": "Client Sneakers",
            "description": "should never exist",
            "price": "10.00",
            "stock": 1,
            "size": 40,
            "color": "black",
            "categoryId": 1,
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_duplicate_product_variant_conflicts() {
    let (staff, _) = staff_account().await;
    let category_id = any_category_id(&staff).await;
    let product = create_product(&staff, category_id, "15.00", 3).await;

    // Same name, size and color is the same variant
    let resp = staff
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": product["name"],
            "description": "second copy",
            "price": "15.00",
            "stock": 3,
            "size": product["size"],
            "color": product["color"],
            "categoryId": category_id,
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_product_validation() {
    let (staff, _) = staff_account().await;
    let category_id = any_category_id(&staff).await;

    let base = json!({
        "name": format!("Broken Product {}", Uuid::new_v4().simple()),
        "description": "invalid input",
        "price": "10.00",
        "stock": 1,
        "size": 42,
        "color": "orange",
        "categoryId": category_id,
    });

    let cases = [
        ("price", json!("-1.00")),
        ("stock", json!(-1)),
        ("size", json!(-1)),
        ("categoryId", json!(999_999_999)),
    ];
    for (field, value) in cases {
        let mut body = base.clone();
        body[field] = value;
        let resp = staff
            .post(format!("{}/api/products", base_url()))
            .json(&body)
            .send()
            .await
            .expect("request failed");
        assert!(
            resp.status() == StatusCode::BAD_REQUEST || resp.status() == StatusCode::NOT_FOUND,
            "field {field} should be rejected, got {}",
            resp.status()
        );
    }
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_owner_updates_and_deletes_product() {
    let (staff, _) = staff_account().await;
    let category_id = any_category_id(&staff).await;
    let product = create_product(&staff, category_id, "20.00", 5).await;
    let product_id = product["id"].as_i64().expect("product id");

    let resp = staff
        .patch(format!("{}/api/products/{product_id}", base_url()))
        .json(&json!({ "price": "18.00", "stock": 7 }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(updated["price"], "18.00");
    assert_eq!(updated["stock"], 7);

    let resp = staff
        .delete(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Never referenced by a cart or order, so it is gone for good
    let resp = staff
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_referenced_product_is_retired_not_deleted() {
    let (staff, _) = staff_account().await;
    let category_id = any_category_id(&staff).await;
    let product = create_product(&staff, category_id, "8.00", 5).await;
    let product_id = product["id"].as_i64().expect("product id");

    // A client holds it in a cart
    let (client_http, _user) = fresh_client_account("catalog-holder").await;
    let resp = client_http
        .post(format!("{}/api/cart/items", base_url()))
        .json(&json!({ "productId": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = staff
        .delete(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Still readable, but retired to zero stock
    let resp = staff
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let retired = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(retired["stock"], 0);
}

// --- categories ---

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_category_listing_is_public() {
    let http = clementine_integration_tests::client();
    let resp = http
        .get(format!("{}/api/categories", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = unwrap_response(resp.json().await.expect("body"));
    assert!(page["totalCount"].as_i64().expect("count") >= 1, "catalog is seeded");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_personnel_cannot_manage_categories() {
    let (staff, _) = staff_account().await;
    let resp = staff
        .post(format!("{}/api/categories", base_url()))
        .json(&json!({ "name": "Staff Category", "description": "nope" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server, seeded database and admin credentials"]
async fn test_admin_manages_categories() {
    let Some((admin, _user)) = admin_account().await else {
        eprintln!("skipping: CLEMENTINE_ADMIN_EMAIL / CLEMENTINE_ADMIN_PASSWORD not set");
        return;
    };

    let name = format!("Season {}", Uuid::new_v4().simple());
    let resp = admin
        .post(format!("{}/api/categories", base_url()))
        .json(&json!({ "name": name, "description": "limited run" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let category = unwrap_response(resp.json().await.expect("body"));
    let category_id = category["id"].as_i64().expect("category id");

    // Duplicate names conflict
    let resp = admin
        .post(format!("{}/api/categories", base_url()))
        .json(&json!({ "name": name, "description": "again" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = admin
        .patch(format!("{}/api/categories/{category_id}", base_url()))
        .json(&json!({ "description": "updated copy" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(updated["description"], "updated copy");

    let resp = admin
        .delete(format!("{}/api/categories/{category_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .get(format!("{}/api/categories/{category_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- feedback ---

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_feedback_submitted_once_per_client() {
    let (http, _user) = fresh_client_account("feedback").await;

    let body = json!({
        "feedback": "Fast delivery, would shop again.",
        "overallRating": 5,
        "deliveryRating": 4,
        "favoriteFeatures": "the cart",
    });

    let resp = http
        .post(format!("{}/api/feedback", base_url()))
        .json(&body)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let form = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(form["overallRating"], 5);

    // Readable back
    let resp = http
        .get(format!("{}/api/feedback", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(fetched["id"], form["id"]);

    // Second submission conflicts
    let resp = http
        .post(format!("{}/api/feedback", base_url()))
        .json(&body)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_staff_cannot_submit_feedback() {
    let (staff, _) = staff_account().await;
    let resp = staff
        .post(format!("{}/api/feedback", base_url()))
        .json(&json!({
            "feedback": "Working here is great.",
            "overallRating": 5,
            "deliveryRating": 5,
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_feedback_listing_is_admin_only() {
    let (http, _user) = fresh_client_account("feedback-list").await;
    let resp = http
        .get(format!("{}/api/feedback/all", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    if let Some((admin, _user)) = admin_account().await {
        let resp = admin
            .get(format!("{}/api/feedback/all", base_url()))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        let page = unwrap_response(resp.json().await.expect("body"));
        assert!(page["data"].is_array());
    }
}
