use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::password;

/// A stored credential record. Passwords are held only as salted digests.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new user with a freshly salted credential digest.
    pub fn create(username: &str, plaintext: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password::hash(plaintext),
            created_at: Utc::now(),
        }
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        password::verify(candidate, &self.password_hash)
    }
}
