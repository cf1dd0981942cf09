//! End-to-end tests for `GET /health`.

use axum::http::{Method, StatusCode};

use crate::e2e_tests::helpers::TestServer;

#[tokio::test]
async fn test_health_reports_healthy() {
    let server = TestServer::new();
    let response = server.send(Method::GET, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route() {
    let server = TestServer::new();
    let response = server.send(Method::GET, "/does-not-exist", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
