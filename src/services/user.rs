use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use validator::Validate;

use crate::errors::{AppError, RepositoryError};
use crate::models::{CredentialsForm, User};
use crate::repositories::UserRepositoryTrait;
use crate::types::Result;

#[async_trait]
pub trait UserServiceTrait {
    async fn exists(&self, email: &str) -> Result<bool>;

    /// Returns the user only when both email and password match exactly
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>>;

    async fn register(&self, credentials: CredentialsForm) -> Result<User>;
}

pub struct UserService<T: UserRepositoryTrait> {
    repository: Arc<T>,
}

impl<T: UserRepositoryTrait> UserService<T> {
    pub fn new(repository: Arc<T>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &T {
        &self.repository
    }
}

#[async_trait]
impl<T: UserRepositoryTrait> UserServiceTrait for UserService<T> {
    async fn exists(&self, email: &str) -> Result<bool> {
        Ok(self.repository.find_by_email(email).await?.is_some())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .filter(|user| user.matches(email, password));

        if user.is_none() {
            debug!("Rejected credentials for '{}'", email);
        }
        Ok(user)
    }

    async fn register(&self, credentials: CredentialsForm) -> Result<User> {
        credentials.validate()?;

        let user = User::new(credentials.email, credentials.password);
        let user = self.repository.insert(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AppError::Conflict("A user with this email already exists.".to_string())
            }
            other => other.into(),
        })?;

        info!("Registered user {} <{}>", user.id, user.email);
        Ok(user)
    }
}
