use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::models::User;

type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Stores a new user
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If another user already has this email
    async fn insert(&self, user: &User) -> Result<User>;

    /// Exact, case-sensitive email lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[derive(Default)]
pub struct UserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl UserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.users.read().len()
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn insert(&self, user: &User) -> Result<User> {
        // Email uniqueness is checked under the same write lock as the insert
        let mut users = self.users.write();

        if users.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }
        if users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict(format!(
                "User with id '{}' already exists",
                user.id
            )));
        }

        users.insert(user.id, user.clone());
        debug!("Stored user {} ({} total)", user.id, users.len());
        Ok(user.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}
