//! Integration tests for the account administration routes.

mod common;

use axum::http::{Method, StatusCode};
use common::test_app;
use serde_json::json;

#[tokio::test]
async fn listing_requires_admin_role() {
    let app = test_app();
    let (_, user_token) = app.register("Ana", "ana@mail.com", "secret1").await;
    let (_, admin_token) = app
        .register_admin("Root", "root@mail.com", "secret1")
        .await;

    let (status, body) = app
        .send(Method::GET, "/api/users", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = app
        .send(Method::GET, "/api/users", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let accounts = body["data"].as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    // newest first
    assert_eq!(accounts[0]["email"], "root@mail.com");
    assert!(accounts.iter().all(|a| a.get("passwordDigest").is_none()));
}

#[tokio::test]
async fn promotion_applies_to_existing_tokens() {
    let app = test_app();
    let (_, token) = app.register("Ana", "ana@mail.com", "secret1").await;

    let (status, _) = app
        .send(Method::GET, "/api/users", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.state
        .auth
        .set_role_by_email("ANA@mail.com", pastel_core::models::account::Role::Admin)
        .await
        .unwrap();

    let (status, _) = app
        .send(Method::GET, "/api/users", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn account_can_read_itself_but_not_others() {
    let app = test_app();
    let (ana_id, ana_token) = app.register("Ana", "ana@mail.com", "secret1").await;
    let (bo_id, _) = app.register("Bo", "bo@mail.com", "secret2").await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/users/{ana_id}"), Some(&ana_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["displayName"], "Ana");

    let (status, _) = app
        .send(Method::GET, &format!("/api/users/{bo_id}"), Some(&ana_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_read_any_account_and_sees_missing_ones() {
    let app = test_app();
    let (ana_id, _) = app.register("Ana", "ana@mail.com", "secret1").await;
    let (_, admin_token) = app
        .register_admin("Root", "root@mail.com", "secret1")
        .await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/users/{ana_id}"), Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ana@mail.com");

    let missing = uuid::Uuid::now_v7();
    let (status, _) = app
        .send(Method::GET, &format!("/api/users/{missing}"), Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = test_app();
    let (_, token) = app.register("Ana", "ana@mail.com", "secret1").await;

    let (status, body) = app
        .send(Method::GET, "/api/users/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid account id");
}

#[tokio::test]
async fn self_update_changes_profile_and_password() {
    let app = test_app();
    let (id, token) = app.register("Ana", "ana@mail.com", "secret1").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/users/{id}"),
            Some(&token),
            Some(json!({"displayName": "Ana B", "email": " AnaB@Mail.com", "password": "secret2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["displayName"], "Ana B");
    assert_eq!(body["data"]["email"], "anab@mail.com");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ana@mail.com", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "anab@mail.com", "password": "secret2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_to_taken_email_is_rejected() {
    let app = test_app();
    let (id, token) = app.register("Ana", "ana@mail.com", "secret1").await;
    app.register("Bo", "bo@mail.com", "secret2").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/users/{id}"),
            Some(&token),
            Some(json!({"email": "BO@mail.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn update_with_empty_field_is_bad_request() {
    let app = test_app();
    let (id, token) = app.register("Ana", "ana@mail.com", "secret1").await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/users/{id}"),
            Some(&token),
            Some(json!({"displayName": "   "})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_admins_change_roles() {
    let app = test_app();
    let (ana_id, ana_token) = app.register("Ana", "ana@mail.com", "secret1").await;
    let (_, admin_token) = app
        .register_admin("Root", "root@mail.com", "secret1")
        .await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/users/{ana_id}"),
            Some(&ana_token),
            Some(json!({"role": "admin"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/users/{ana_id}"),
            Some(&admin_token),
            Some(json!({"role": "admin"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn deleted_account_cannot_use_its_token() {
    let app = test_app();
    let (id, token) = app.register("Ana", "ana@mail.com", "secret1").await;

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/users/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account deleted");
    assert!(app.store.is_empty());

    let (status, _) = app
        .send(Method::GET, "/api/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::GET, &format!("/api/users/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the email is free again
    app.register("Ana", "ana@mail.com", "secret1").await;
}

#[tokio::test]
async fn user_cannot_delete_another_account() {
    let app = test_app();
    let (_, ana_token) = app.register("Ana", "ana@mail.com", "secret1").await;
    let (bo_id, _) = app.register("Bo", "bo@mail.com", "secret2").await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/users/{bo_id}"), Some(&ana_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.len(), 2);
}
