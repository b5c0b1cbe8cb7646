// src/services/short_url.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::errors::{AppError, RepositoryError};
use crate::models::ShortUrl;
use crate::repositories::ShortUrlRepositoryTrait;
use crate::types::Result;
use crate::utils::CodeGenerator;
use crate::validations::validate_long_url;

#[async_trait]
pub trait ShortUrlServiceTrait {
    /// Allocates a fresh short code for `long_url`
    async fn create(&self, long_url: &str) -> Result<ShortUrl>;
    async fn lookup(&self, code: &str) -> Result<ShortUrl>;
    async fn list(&self) -> Result<Vec<ShortUrl>>;
    async fn update(&self, code: &str, long_url: &str) -> Result<ShortUrl>;
    async fn delete(&self, code: &str) -> Result<()>;
}

pub struct ShortUrlService<R: ShortUrlRepositoryTrait, G: CodeGenerator> {
    repository: Arc<R>,
    generator: G,
    max_attempts: usize,
}

impl<R: ShortUrlRepositoryTrait, G: CodeGenerator> ShortUrlService<R, G> {
    pub fn new(repository: Arc<R>, generator: G, max_attempts: usize) -> Self {
        Self {
            repository,
            generator,
            max_attempts,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

fn check_long_url(long_url: &str) -> Result<&str> {
    validate_long_url(long_url).map_err(|e| {
        AppError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string()),
        )
    })?;
    Ok(long_url.trim())
}

#[async_trait]
impl<R, G> ShortUrlServiceTrait for ShortUrlService<R, G>
where
    R: ShortUrlRepositoryTrait,
    G: CodeGenerator,
{
    async fn create(&self, long_url: &str) -> Result<ShortUrl> {
        let long_url = check_long_url(long_url)?;

        // Generated codes are not unique by construction; a taken code is
        // retried rather than overwritten.
        for attempt in 1..=self.max_attempts {
            let candidate = ShortUrl::new(self.generator.generate(), long_url);

            match self.repository.save(&candidate).await {
                Ok(saved) => {
                    info!("Created short code '{}' for '{}'", saved.short_code, saved.long_url);
                    return Ok(saved);
                }
                Err(RepositoryError::Conflict(_)) => {
                    warn!(
                        "Short code '{}' already taken (attempt {}/{})",
                        candidate.short_code, attempt, self.max_attempts
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(
            "Failed to generate a unique short code after multiple attempts".to_string(),
        ))
    }

    async fn lookup(&self, code: &str) -> Result<ShortUrl> {
        debug!("Looking up short code '{}'", code);
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Short code '{}' does not exist", code)))
    }

    async fn list(&self) -> Result<Vec<ShortUrl>> {
        Ok(self.repository.find_all().await?)
    }

    async fn update(&self, code: &str, long_url: &str) -> Result<ShortUrl> {
        // Unknown codes report not-found regardless of the submitted URL
        if self.repository.find_by_code(code).await?.is_none() {
            return Err(AppError::NotFound(format!("Short code '{}' does not exist", code)));
        }
        let long_url = check_long_url(long_url)?;

        let updated = self
            .repository
            .update(code, long_url)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Short code '{}' does not exist", code)))?;

        info!("Short code '{}' now points to '{}'", code, updated.long_url);
        Ok(updated)
    }

    async fn delete(&self, code: &str) -> Result<()> {
        self.repository.delete(code, true).await?;
        info!("Deleted short code '{}'", code);
        Ok(())
    }
}
