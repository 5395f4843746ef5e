use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::errors::DirectoryError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRecord;
use crate::domain::user::ports::UserDirectory;

/// Process-local user directory.
///
/// The uniqueness check and the write happen under one write lock, so two
/// concurrent registrations of the same email cannot both succeed.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user, returning the removed record.
    pub async fn remove(&self, id: &UserId) -> Option<UserRecord> {
        self.users.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|record| &record.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn insert(&self, record: UserRecord) -> Result<UserId, DirectoryError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|existing| existing.user.email == record.user.email)
        {
            return Err(DirectoryError::DuplicateKey("email".to_string()));
        }
        if users.contains_key(&record.user.id) {
            return Err(DirectoryError::DuplicateKey("id".to_string()));
        }

        let id = record.user.id;
        users.insert(id, record);

        Ok(id)
    }
}
