//! Process-wide session state, keyed by an opaque session token.
//!
//! The token is handed out at login and travels back in the
//! `Authorization: Bearer <token>` header. Sessions live for the process
//! lifetime; there is no expiry sweep.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::AuthUser;

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, AuthUser>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for the given user and return its token.
    pub async fn create(&self, user: AuthUser) -> String {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), user);
        token
    }

    /// Resolve a token to its session user, if the session is live.
    pub async fn get(&self, token: &str) -> Option<AuthUser> {
        let sessions = self.sessions.read().await;
        sessions.get(token).cloned()
    }

    /// Destroy the session for a token. Idempotent.
    pub async fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }
}

/// Extract the session token from an `Authorization: Bearer <token>` header.
///
/// Absence is not an error here; routes decide what an unauthenticated
/// request means for them.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))?;

    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
