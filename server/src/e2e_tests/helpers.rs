//! Common helpers for end-to-end tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::auth::{PublishedKeySet, TokenClaims};
use crate::routes::{AppState, router};
use crate::service::AuthService;
use crate::testing::new_test_service;

/// A response reduced to what the tests look at.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Router over a fresh in-memory store and the shared test signing key.
pub struct TestServer {
    app: Router,
    pub service: Arc<AuthService>,
}

impl TestServer {
    #[must_use]
    pub fn new() -> Self {
        let service = Arc::new(new_test_service());
        let app = router(AppState::new(Arc::clone(&service)));
        Self { app, service }
    }

    /// Send one request through the router.
    #[allow(clippy::expect_used)] // Malformed responses fail the test
    pub async fn send(&self, method: Method, path: &str, body: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body)
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        let body = json!({ "email": email, "password": password }).to_string();
        self.send(Method::POST, "/register", Some(body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        let body = json!({ "email": email, "password": password }).to_string();
        self.send(Method::POST, "/login", Some(body)).await
    }

    /// Fetch and parse the published key set over HTTP.
    #[allow(clippy::expect_used)] // Malformed responses fail the test
    pub async fn fetch_key_set(&self) -> PublishedKeySet {
        let response = self.send(Method::GET, "/.jwk", None).await;
        assert_eq!(response.status, StatusCode::OK);
        serde_json::from_value(response.body).expect("key set document")
    }
}

/// Verify `token` the way an edge gateway would: pick the key by `kid` from
/// the published set and check the RS256 signature.
pub fn verify_with_key_set(
    token: &str,
    key_set: &PublishedKeySet,
) -> Result<TokenClaims, String> {
    let header = decode_header(token).map_err(|e| e.to_string())?;
    let kid = header.kid.ok_or("token has no kid")?;
    let key = key_set.decoding_key(&kid).ok_or("unknown kid")?;
    decode::<TokenClaims>(token, &key, &Validation::new(Algorithm::RS256))
        .map(|data| data.claims)
        .map_err(|e| e.to_string())
}

/// Pull the token string out of a successful login response.
#[allow(clippy::expect_used)] // Malformed responses fail the test
pub fn token_of(response: &TestResponse) -> String {
    assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
    response.body["token"]
        .as_str()
        .expect("token field")
        .to_string()
}
