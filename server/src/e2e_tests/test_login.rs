//! End-to-end tests for `POST /login`.
//!
//! These tests verify:
//! 1. A registered identity receives a token whose claims describe it
//! 2. Wrong passwords and unknown handles produce byte-identical responses
//! 3. Malformed input is rejected as a validation failure

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestServer, token_of, verify_with_key_set};

#[allow(clippy::expect_used)]
#[tokio::test]
async fn test_login_scenario() {
    let server = TestServer::new();

    let registered = server.register("a@example.com", "longpassword1").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    let id = registered.body["id"].as_str().expect("id").to_string();

    let before = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs();
    let token = token_of(&server.login("a@example.com", "longpassword1").await);
    let after = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs();

    let claims = verify_with_key_set(&token, &server.fetch_key_set().await).expect("valid token");
    assert_eq!(claims.sub, id);
    assert_eq!(claims.email, "a@example.com");
    assert_eq!(claims.roles, vec!["user".to_string()]);
    assert_eq!(claims.exp, claims.iat + 24 * 60 * 60);
    assert!(claims.iat >= before && claims.iat <= after);

    let wrong = server.login("a@example.com", "wrongpass").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["error"], "Invalid email or password");

    let unknown = server.login("unknown@example.com", "whatever1").await;
    assert_eq!(unknown.status, wrong.status);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn test_login_before_registration() {
    let server = TestServer::new();
    let response = server.login("a@example.com", "longpassword1").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_short_password_is_validation_failure() {
    let server = TestServer::new();
    server.register("a@example.com", "longpassword1").await;

    let response = server.login("a@example.com", "short").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_is_case_sensitive_on_password() {
    let server = TestServer::new();
    server.register("a@example.com", "LongPassword1").await;

    let response = server.login("a@example.com", "longpassword1").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_each_login_issues_a_verifiable_token() {
    let server = TestServer::new();
    server.register("a@example.com", "longpassword1").await;
    let key_set = server.fetch_key_set().await;

    for _ in 0..3 {
        let token = token_of(&server.login("a@example.com", "longpassword1").await);
        assert!(verify_with_key_set(&token, &key_set).is_ok());
    }
}
