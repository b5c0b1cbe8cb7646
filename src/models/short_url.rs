// src/models/short_url.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validations::validate_long_url;

/// Form body for creating a short URL (`POST /urls`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShortUrlForm {
    #[serde(rename = "longURL", default)]
    #[validate(custom(function = "validate_long_url"))]
    pub long_url: String,
}

/// Form body for pointing an existing short code elsewhere (`POST /urls/{code}`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateShortUrlForm {
    #[serde(rename = "updatedURL", default)]
    #[validate(custom(function = "validate_long_url"))]
    pub updated_url: String,
}

/// A short code and the long URL it points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrl {
    /// The generated short code that identifies this URL
    pub short_code: String,

    /// The original, long URL that was shortened
    pub long_url: String,

    /// When this mapping was created
    pub created_at: DateTime<Utc>,

    /// When the long URL was last replaced
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShortUrl {
    pub fn new(short_code: impl Into<String>, long_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            long_url: long_url.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Replace the destination, stamping the update time
    pub fn retarget(&mut self, long_url: impl Into<String>) {
        self.long_url = long_url.into();
        self.updated_at = Some(Utc::now());
    }
}
