//! Login, logout and the bearer-token gate
//!
//! Login checks the access table through the configured [`Authenticator`]
//! and issues a random token. Tokens live in memory only; a restart logs
//! everyone out.
//!
//! [`Authenticator`]: orgchart_common::auth::Authenticator

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use orgchart_common::auth::{AuthError, UserIdentity};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user: UserIdentity,
}

/// Token from an `Authorization: Bearer <uuid>` header
fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, LoginError> {
    let user = state
        .auth
        .authenticate(&request.email, &request.password)
        .await
        .map_err(LoginError)?;

    let token = Uuid::new_v4();
    state.tokens.write().await.insert(token);
    info!(email = %user.email, "Issued session token");

    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    if let Some(token) = bearer_token(&headers) {
        state.tokens.write().await.remove(&token);
    }
    Json(json!({ "status": "ok" }))
}

/// Authentication middleware
///
/// Applied to protected routes only. Returns 401 when the bearer token is
/// missing or unknown.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, GateError> {
    if !state.auth_enabled {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers()).ok_or(GateError::MissingToken)?;
    if !state.tokens.read().await.contains(&token) {
        warn!("Rejected request with unknown token");
        return Err(GateError::UnknownToken);
    }

    Ok(next.run(request).await)
}

/// Token gate failures
#[derive(Debug)]
pub enum GateError {
    MissingToken,
    UnknownToken,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let message = match self {
            GateError::MissingToken => "Missing bearer token",
            GateError::UnknownToken => "Invalid or expired session",
        };
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

/// Login failure as an HTTP response
#[derive(Debug)]
pub struct LoginError(pub AuthError);

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::Inactive(_) => StatusCode::UNAUTHORIZED,
            AuthError::Backend(ref e) => {
                warn!("Login backend failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
