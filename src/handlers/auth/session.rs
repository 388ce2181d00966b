use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::sessions::bearer_token;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/login - Verify credentials and open a session
///
/// Expected Input:
/// ```json
/// {
///   "username": "string",
///   "password": "string"
/// }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "token": "opaque session token",
///   "user": { "id": "...", "username": "...", "created_at": "..." }
/// }
/// ```
///
/// An unknown username fails with `Incorrect username`, a failed password
/// verification with `Incorrect password`; both are 401.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = match state.store.find_user(&payload.username).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ApiError::unauthorized("Incorrect username")),
        Err(e) => {
            tracing::error!("user lookup failed: {}", e);
            return Err(ApiError::internal_server_error("Authentication failed"));
        }
    };

    if !user.verify_password(&payload.password) {
        return Err(ApiError::unauthorized("Incorrect password"));
    }

    let auth_user = AuthUser::from(&user);
    let token = state.sessions.create(auth_user.clone()).await;
    tracing::info!("User '{}' logged in", auth_user.username);

    Ok((
        StatusCode::OK,
        Json(json!({ "token": token, "user": auth_user })),
    ))
}

/// POST /api/logout - Destroy the current session
///
/// Idempotent: succeeds with the same body whether or not a session was
/// attached to the request.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.revoke(&token).await;
    }

    (
        StatusCode::OK,
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// GET /api/check-auth - Report the session bound to the bearer token
///
/// Expected Output:
/// - 200 `{"authenticated": true, "user": {...}}` for a live session
/// - 401 `{"authenticated": false, "user": null}` otherwise
pub async fn check_auth(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let user = match bearer_token(&headers) {
        Some(token) => state.sessions.get(&token).await,
        None => None,
    };

    match user {
        Some(user) => (
            StatusCode::OK,
            Json(json!({ "authenticated": true, "user": user })),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false, "user": null })),
        ),
    }
}
