//! In-memory user store for development and testing
//!
//! Keeps all records in memory. Suitable for development, testing, or
//! small single-node deployments.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::UserStore;
use crate::auth::user::{Role, UserRecord};
use crate::error::Result;
use crate::security::password::hash_password;

pub struct MemoryUserStore {
    users: Arc<RwLock<Vec<UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Adds an account, hashing the plaintext password.
    pub async fn add_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserRecord> {
        let record = UserRecord::new(username, email, &hash_password(password)?, role);
        self.users.write().await.push(record.clone());
        Ok(record)
    }

    /// Adds a pre-built record (password already hashed).
    pub async fn add_record(&self, record: UserRecord) {
        self.users.write().await.push(record);
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|user| user.email == identifier || user.username == identifier)
            .cloned())
    }
}
