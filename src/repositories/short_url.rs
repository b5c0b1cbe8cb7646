// src/repositories/short_url.rs - Data access
use std::collections::BTreeMap;

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;

use crate::errors::RepositoryError;
use crate::models::ShortUrl;

type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepositoryTrait: Send + Sync {
    /// Stores a new short URL under its short code
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If the short code is already mapped
    async fn save(&self, url: &ShortUrl) -> Result<ShortUrl>;

    /// Finds a short URL by its short code
    ///
    /// ### Returns
    /// * `Result<Option<ShortUrl>>` - The short URL if found, or `None` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>>;

    /// Returns every stored short URL, ordered by short code
    async fn find_all(&self) -> Result<Vec<ShortUrl>>;

    /// Points an existing short code at a new long URL
    ///
    /// ### Returns
    /// * `Result<Option<ShortUrl>>` - The updated record, or `None` if the code is unknown
    async fn update(&self, code: &str, long_url: &str) -> Result<Option<ShortUrl>>;

    /// Deletes a short URL by its short code
    ///
    /// ### Arguments
    /// * `code` - The short code to delete
    /// * `require_exists` - If `true`, an error will be returned if the code does not exist
    ///
    /// ### Returns
    /// * `Result<bool>` - whether a record was removed
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - If the code doesn't exist and `require_exists` is `true`
    async fn delete(&self, code: &str, require_exists: bool) -> Result<bool>;
}

/// In-process store; readers share the lock, writers are exclusive.
#[derive(Default)]
pub struct ShortUrlRepository {
    urls: RwLock<BTreeMap<String, ShortUrl>>,
}

impl ShortUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.urls.read().len()
    }
}

#[async_trait]
impl ShortUrlRepositoryTrait for ShortUrlRepository {
    async fn save(&self, url: &ShortUrl) -> Result<ShortUrl> {
        let mut urls = self.urls.write();

        if urls.contains_key(&url.short_code) {
            return Err(RepositoryError::Conflict(format!(
                "Short code '{}' is already in use",
                url.short_code
            )));
        }

        urls.insert(url.short_code.clone(), url.clone());
        debug!("Stored short code '{}' ({} total)", url.short_code, urls.len());
        Ok(url.clone())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>> {
        Ok(self.urls.read().get(code).cloned())
    }

    async fn find_all(&self) -> Result<Vec<ShortUrl>> {
        Ok(self.urls.read().values().cloned().collect())
    }

    async fn update(&self, code: &str, long_url: &str) -> Result<Option<ShortUrl>> {
        let mut urls = self.urls.write();

        Ok(urls.get_mut(code).map(|url| {
            url.retarget(long_url);
            url.clone()
        }))
    }

    async fn delete(&self, code: &str, require_exists: bool) -> Result<bool> {
        let is_deleted = self.urls.write().remove(code).is_some();

        if require_exists && !is_deleted {
            return Err(RepositoryError::NotFound(format!(
                "Short code '{}' not found",
                code
            )));
        }

        Ok(is_deleted)
    }
}
