//! Integration tests for registration, login and account management.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p clementine-server)
//!
//! Run with: cargo test -p clementine-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;

use clementine_integration_tests::{
    base_url, client, fresh_client_account, login, register, unique_email, unwrap_response,
};

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_register_and_login_flow() {
    let http = client();
    let email = unique_email("register");

    let user = register(&http, &email, "integration-pass").await;
    assert_eq!(user["email"], email);
    assert_eq!(user["role"], "client");
    assert!(user["cartId"].is_number(), "registration creates a cart");

    let logged_in = login(&http, &email, "integration-pass").await;
    assert_eq!(logged_in["id"], user["id"]);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_register_duplicate_email_conflicts() {
    let http = client();
    let email = unique_email("duplicate");

    register(&http, &email, "integration-pass").await;

    let resp = http
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({ "email": email, "name": "Other", "password": "integration-pass" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_register_rejects_bad_input() {
    let http = client();

    let resp = http
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({ "email": "not-an-email", "name": "X", "password": "integration-pass" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = http
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({ "email": unique_email("weak"), "name": "X", "password": "short" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_login_wrong_password_rejected() {
    let http = client();
    let email = unique_email("wrongpass");
    register(&http, &email, "integration-pass").await;

    let resp = http
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_me_requires_session() {
    let http = client();

    let resp = http
        .get(format!("{}/api/users/me", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_logout_ends_session() {
    let (http, _user) = fresh_client_account("logout").await;

    let resp = http
        .post(format!("{}/api/auth/logout", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = http
        .get(format!("{}/api/users/me", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_user_listing_is_admin_only() {
    let (http, _user) = fresh_client_account("listing").await;

    let resp = http
        .get(format!("{}/api/users", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_update_own_name() {
    let (http, user) = fresh_client_account("rename").await;
    let id = user["id"].as_i64().expect("user id");

    let resp = http
        .patch(format!("{}/api/users/{id}", base_url()))
        .json(&json!({ "name": "Renamed User" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = unwrap_response(resp.json().await.expect("body"));
    assert_eq!(updated["name"], "Renamed User");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_cannot_touch_foreign_account() {
    let (_victim_http, victim) = fresh_client_account("victim").await;
    let (http, _attacker) = fresh_client_account("attacker").await;
    let victim_id = victim["id"].as_i64().expect("user id");

    let resp = http
        .patch(format!("{}/api/users/{victim_id}", base_url()))
        .json(&json!({ "name": "Hacked" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = http
        .delete(format!("{}/api/users/{victim_id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_delete_own_account() {
    let http = client();
    let email = unique_email("selfdelete");
    register(&http, &email, "integration-pass").await;
    let user = login(&http, &email, "integration-pass").await;
    let id = user["id"].as_i64().expect("user id");

    let resp = http
        .delete(format!("{}/api/users/{id}", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Session ended, credentials gone
    let resp = http
        .get(format!("{}/api/users/me", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = http
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "integration-pass" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
