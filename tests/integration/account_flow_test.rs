//! End-to-end account lifecycle against PostgreSQL.

use axum::http::StatusCode;
use serde_json::json;

use userbase_database::UserDirectory;

use crate::helpers::{PASSWORD, TestApp, unique_email};

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_created_account_verifies_then_logs_in() {
    let app = TestApp::new().await;
    let admin_email = unique_email("admin");
    app.create_user(&admin_email, true).await;
    let (admin_token, _) = app.login(&admin_email, PASSWORD).await;

    let email = unique_email("member");
    let created = app
        .request(
            "POST",
            "/user",
            Some(json!({
                "name": "Member",
                "email": email,
                "password": "member-password",
                "confirm_password": "member-password",
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{}", created.body);
    assert_eq!(created.body["data"]["verified"], false);

    // The verification email is a queued job, not a synchronous send.
    let queued: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM jobs WHERE queue = 'critical' AND payload->>'to' = $1",
    )
    .bind(&email)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(queued, 1);

    let code = app
        .users
        .find_by_email(&email)
        .await
        .unwrap()
        .verification_code
        .expect("verification code stored");

    let verified = app
        .request("GET", &format!("/auth/verifyemail?code={code}"), None, None)
        .await;
    assert_eq!(verified.status, StatusCode::OK, "{}", verified.body);

    let again = app
        .request("GET", &format!("/auth/verifyemail?code={code}"), None, None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let (access, _) = app.login(&email, "member-password").await;
    let me = app.request("GET", "/user/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["email"], email);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_refresh_rotation_survives_database_round_trip() {
    let app = TestApp::new().await;
    let email = unique_email("rotate");
    app.create_user(&email, false).await;
    let (_, refresh) = app.login(&email, PASSWORD).await;

    let first = app
        .request("GET", "/auth/refresh", None, Some(&refresh))
        .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    let rotated = first.body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    let reused = app
        .request("GET", "/auth/refresh", None, Some(&refresh))
        .await;
    assert_eq!(reused.status, StatusCode::UNAUTHORIZED);

    let next = app
        .request("GET", "/auth/refresh", None, Some(&rotated))
        .await;
    assert_eq!(next.status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_items_follow_their_owner() {
    let app = TestApp::new().await;
    let email = unique_email("items");
    app.create_user(&email, false).await;
    let (access, _) = app.login(&email, PASSWORD).await;

    let created = app
        .request(
            "POST",
            "/item",
            Some(json!({"title": "Bike", "description": "Red bicycle"})),
            Some(&access),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{}", created.body);
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let listed = app.request("GET", "/item", None, Some(&access)).await;
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 1);

    let other_email = unique_email("other");
    app.create_user(&other_email, false).await;
    let (other, _) = app.login(&other_email, PASSWORD).await;
    let denied = app
        .request("GET", &format!("/item/{id}"), None, Some(&other))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let deleted = app
        .request("DELETE", &format!("/item/{id}"), None, Some(&access))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_health_reports_database() {
    let app = TestApp::new().await;

    let health = app.request("GET", "/health", None, None).await;

    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["database"], "connected");
}
