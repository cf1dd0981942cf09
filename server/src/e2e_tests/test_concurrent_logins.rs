//! Concurrent logins must never mix up identities.

use std::collections::HashMap;

use axum::http::StatusCode;
use futures::future::join_all;

use crate::e2e_tests::helpers::{TestServer, token_of, verify_with_key_set};

#[allow(clippy::expect_used)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins_get_their_own_subject() {
    let server = TestServer::new();

    let mut ids = HashMap::new();
    for n in 0..6 {
        let email = format!("user{n}@example.com");
        let response = server.register(&email, &format!("password-{n}-long")).await;
        assert_eq!(response.status, StatusCode::CREATED);
        ids.insert(
            email,
            response.body["id"].as_str().expect("id").to_string(),
        );
    }

    let logins = (0..6).map(|n| {
        let server = &server;
        async move {
            let email = format!("user{n}@example.com");
            let response = server.login(&email, &format!("password-{n}-long")).await;
            (email, token_of(&response))
        }
    });
    let results = join_all(logins).await;

    let key_set = server.fetch_key_set().await;
    for (email, token) in results {
        let claims = verify_with_key_set(&token, &key_set).expect("valid token");
        assert_eq!(claims.email, email);
        assert_eq!(&claims.sub, &ids[&email]);
    }
}
