//! Record store seam.
//!
//! Two collections (users and digital estates) behind one trait, with a
//! Postgres backend for deployments and an in-memory backend for development
//! and tests. Backend selection is driven by `DATABASE_URL` presence.

pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use self::models::estate::{DigitalEstate, EstateDraft, EstatePatch};
use self::models::user::User;

/// Errors from store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The draft or patch failed schema-level casting or validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated.
    #[error("Duplicate record: {0}")]
    Conflict(String),

    /// Backend-specific failure outside sqlx's error type.
    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Query/command interface over the document store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cast and persist a draft; the store assigns the record id.
    async fn insert_estate(&self, draft: EstateDraft) -> Result<DigitalEstate, StoreError>;

    /// Every estate record, store-defined order.
    async fn list_estates(&self) -> Result<Vec<DigitalEstate>, StoreError>;

    async fn find_estate(&self, id: Uuid) -> Result<Option<DigitalEstate>, StoreError>;

    /// Merge the patch onto the stored record. `None` when no record has the
    /// given id.
    async fn update_estate(
        &self,
        id: Uuid,
        patch: EstatePatch,
    ) -> Result<Option<DigitalEstate>, StoreError>;

    /// Remove a record; `false` when none existed.
    async fn delete_estate(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn insert_user(&self, user: User) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn delete_user(&self, username: &str) -> Result<bool, StoreError>;

    /// Cheap liveness probe for the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Build the store backend the configuration selects.
pub async fn from_config(config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
    match &config.url {
        Some(url) => {
            let store = postgres::PostgresStore::connect(url, config.max_connections).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(memory::MemoryStore::new()))
        }
    }
}
