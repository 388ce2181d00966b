//! In-memory store backend.
//!
//! Backs development runs and the test suite when no `DATABASE_URL` is
//! configured. State lives for the process lifetime.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::estate::{DigitalEstate, EstateDraft, EstatePatch};
use super::models::user::User;
use super::{Store, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    estates: RwLock<HashMap<Uuid, DigitalEstate>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_estate(&self, draft: EstateDraft) -> Result<DigitalEstate, StoreError> {
        let record = draft.into_record()?;
        let mut estates = self.estates.write().await;
        estates.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_estates(&self) -> Result<Vec<DigitalEstate>, StoreError> {
        let estates = self.estates.read().await;
        let mut records: Vec<DigitalEstate> = estates.values().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn find_estate(&self, id: Uuid) -> Result<Option<DigitalEstate>, StoreError> {
        let estates = self.estates.read().await;
        Ok(estates.get(&id).cloned())
    }

    async fn update_estate(
        &self,
        id: Uuid,
        patch: EstatePatch,
    ) -> Result<Option<DigitalEstate>, StoreError> {
        // Cast before the existence check; an uncastable patch is a store
        // failure even for an unknown id.
        let cast = patch.cast()?;
        let mut estates = self.estates.write().await;
        match estates.get_mut(&id) {
            Some(record) => {
                cast.apply(record);
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_estate(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut estates = self.estates.write().await;
        Ok(estates.remove(&id).is_some())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::Conflict(user.username));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut records: Vec<User> = users.values().cloned().collect();
        records.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(records)
    }

    async fn delete_user(&self, username: &str) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.remove(username).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
