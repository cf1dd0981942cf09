// Life of a login request:
// 1. JSON body comes in
// 2. Validate email / password shape
// 3. Look up the stored credential and verify it off the async workers
// 4. Sign a bearer token with the process RSA key
// 5. Respond with the token
//
// Verifiers fetch the JWKS once and check tokens on their own.
//
// System components:
//  - Credential verifier (Argon2id)
//  - Key custodian (process-lifetime RSA key, RFC 7638 kid)
//  - Token issuer (RS256 JWT)
//  - Key publisher (JWKS document)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod testing;

pub use error::{BootError, RequestError};
pub use routes::{AppState, router};
pub use service::{AuthService, LoginOutcome};
