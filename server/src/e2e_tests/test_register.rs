//! End-to-end tests for `POST /register`.

use axum::http::{Method, StatusCode};

use crate::e2e_tests::helpers::TestServer;
use crate::routes::MALFORMED_BODY_MESSAGE;

#[allow(clippy::expect_used)]
#[tokio::test]
async fn test_register_returns_id_and_email() {
    let server = TestServer::new();
    let response = server.register("a@example.com", "longpassword1").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["email"], "a@example.com");
    let id = response.body["id"].as_str().expect("id field");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[allow(clippy::expect_used)]
#[tokio::test]
async fn test_register_never_echoes_secrets() {
    let server = TestServer::new();
    let response = server.register("a@example.com", "longpassword1").await;

    let object = response.body.as_object().expect("JSON object");
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["email", "id"]);

    let text = response.body.to_string();
    assert!(!text.contains("longpassword1"));
    assert!(!text.contains("argon2"));
}

#[tokio::test]
async fn test_register_short_password() {
    let server = TestServer::new();
    let response = server.register("a@example.com", "short").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "password must be at least 8 characters"
    );

    // Nothing was stored: the same handle registers fine afterwards.
    let response = server.register("a@example.com", "longpassword1").await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let server = TestServer::new();
    let response = server.register("not-an-email", "longpassword1").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "email must be a valid email address");
}

#[tokio::test]
async fn test_register_duplicate_handle() {
    let server = TestServer::new();
    let first = server.register("a@example.com", "longpassword1").await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = server.register("a@example.com", "otherpassword").await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "Email already registered");
}

#[tokio::test]
async fn test_register_malformed_body() {
    let server = TestServer::new();

    let response = server
        .send(Method::POST, "/register", Some("{not json".to_string()))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], MALFORMED_BODY_MESSAGE);

    let response = server
        .send(
            Method::POST,
            "/register",
            Some(r#"{"email":"a@example.com"}"#.to_string()),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mistyped_password_is_not_echoed() {
    let server = TestServer::new();
    let body = r#"{"email":"a@example.com","password":98765432123}"#.to_string();

    for path in ["/register", "/login"] {
        let response = server.send(Method::POST, path, Some(body.clone())).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], MALFORMED_BODY_MESSAGE);
        assert!(!response.body.to_string().contains("98765432123"));
    }
}
