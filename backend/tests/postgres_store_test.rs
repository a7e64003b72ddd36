//! PostgreSQL store tests
//!
//! Require a database at TEST_DATABASE_URL. Run with:
//! cargo test --test postgres_store_test -- --ignored --test-threads=1

mod common;

use axum::http::StatusCode;
use invite_gate_backend::auth::AuthError;
use invite_gate_backend::repositories::{AuthStore, NewUser, PgStore, StoreError};
use invite_gate_shared::{RegisterRequest, Role};
use serde_json::json;

fn new_user(name: &str) -> NewUser {
    NewUser {
        email: format!("{}@example.com", name),
        username: name.to_string(),
        password_hash: "hash".to_string(),
        role: Role::User,
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_success() {
    let app = common::TestApp::postgres().await;
    let invite = app.admin_invite().await;

    let name = format!("pg_{}", uuid::Uuid::new_v4().simple());
    let body = json!({
        "email": format!("{}@example.com", name),
        "username": name,
        "password": "SecurePassword123!",
        "invite_token": invite,
    });

    let (status, response) = app.post("/api/register", &body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!response["token"].as_str().unwrap().is_empty());
    assert_eq!(response["user"]["role"], "user");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_email_maps_to_duplicate() {
    let app = common::TestApp::postgres().await;
    let store = PgStore::new(app.pool.clone().unwrap());

    store.insert_user(new_user("dup")).await.unwrap();
    let mut clash = new_user("dup2");
    clash.email = "dup@example.com".to_string();

    assert!(matches!(
        store.insert_user(clash).await,
        Err(StoreError::Duplicate(_))
    ));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_conditional_redeem_succeeds_once() {
    let app = common::TestApp::postgres().await;
    let store = PgStore::new(app.pool.clone().unwrap());
    let invite = app.admin_invite().await;

    assert!(store.redeem_invite(&invite, 1).await.unwrap());
    assert!(!store.redeem_invite(&invite, 1).await.unwrap());

    let record = store.find_invite(&invite).await.unwrap().unwrap();
    assert!(record.used);
    assert_eq!(record.used_by, Some(1));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_transaction_rolls_back_user_when_invite_consumed() {
    let app = common::TestApp::postgres().await;
    let store = PgStore::new(app.pool.clone().unwrap());
    let invite = app.admin_invite().await;
    store.redeem_invite(&invite, 1).await.unwrap();
    let before = app.user_count().await;

    let result = store
        .create_user_redeeming_invite(new_user("orphan"), &invite)
        .await;

    assert!(matches!(result, Err(StoreError::InviteUnavailable)));
    assert_eq!(app.user_count().await, before);
    assert!(store.find_user_by_login("orphan").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_registrations_redeem_once() {
    let app = common::TestApp::postgres().await;
    let invite = app.admin_invite().await;
    let before = app.user_count().await;

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..8 {
        let auth = app.state.auth().clone();
        let req = RegisterRequest {
            email: format!("pgracer{}@example.com", i),
            username: format!("pgracer{}", i),
            password: "pw".to_string(),
            invite_token: invite.clone(),
        };
        tasks.spawn(async move { auth.register(&req).await });
    }

    let mut successes = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(AuthError::InvalidInvite) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(app.user_count().await, before + 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_seeded_admin_login() {
    let app = common::TestApp::postgres().await;

    let token = app.login("admin@admin.com", "admin").await;
    let (status, body) = app.get("/api/protected", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
}
