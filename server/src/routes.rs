//! HTTP routes.
//!
//! - `POST /register` creates an identity from `{email, password}`
//! - `POST /login` exchanges `{email, password}` for a signed token
//! - `GET /.jwk` and `GET /.well-known/jwks.json` publish the verification keys
//! - `GET /health` reports whether the credential store is usable
//!
//! Every error body is `{"error": message}`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;

use crate::error::RequestError;
use crate::service::AuthService;
use crate::types::{Credentials, Identity};

/// How long verifiers may cache the key set. The set never changes while
/// the process runs, so this only bounds staleness across restarts.
const KEY_SET_MAX_AGE_SECS: u32 = 300;

#[derive(Clone)]
pub struct AppState {
    /// Key material, hasher and credential store, fixed at startup.
    pub service: Arc<AuthService>,
}

impl AppState {
    #[must_use]
    pub const fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/.jwk", get(key_set_handler))
        .route("/.well-known/jwks.json", get(key_set_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Hashing(_) | Self::Signing(_) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if self.is_internal() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::debug!("request rejected: {self}");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Reply for any body that does not decode into `Credentials`.
///
/// Fixed text: the decoder's own message can quote submitted field values.
pub const MALFORMED_BODY_MESSAGE: &str = "request body must be JSON {email, password}";

/// Turn a body extraction failure into a validation error.
fn parse_credentials(
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Credentials, RequestError> {
    payload
        .map(|Json(credentials)| credentials)
        .map_err(|rejection| {
            tracing::debug!("rejected request body: status={}", rejection.status());
            RequestError::Validation(MALFORMED_BODY_MESSAGE.to_string())
        })
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
}

async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<Identity>), RequestError> {
    let credentials = parse_credentials(payload)?;
    let identity = state.service.register(credentials).await?;
    Ok((StatusCode::CREATED, Json(identity)))
}

async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>, RequestError> {
    let credentials = parse_credentials(payload)?;
    let token = state.service.login(credentials).await?;
    Ok(Json(TokenResponse { token }))
}

async fn key_set_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={KEY_SET_MAX_AGE_SECS}"),
        )],
        Json(state.service.key_set().clone()),
    )
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.health() {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "healthy" }))),
        Err(e) => {
            tracing::warn!("health check failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
        }
    }
}
