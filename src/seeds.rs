use log::info;

use crate::models::{ShortUrl, User};
use crate::repositories::{ShortUrlRepositoryTrait, UserRepositoryTrait};
use crate::services::Services;
use crate::types::Result;

/// Short URLs present at startup
pub const SEED_URLS: [(&str, &str); 2] = [
    ("b2xVn2", "http://www.lighthouselabs.ca"),
    ("9sm5xK", "http://www.google.com"),
];

/// Accounts present at startup (email, password)
pub const SEED_USERS: [(&str, &str); 2] = [
    ("user@example.com", "purple-monkey-dinosaur"),
    ("user2@example.com", "dishwasher-funk"),
];

/// Pre-populate the stores with the fixed demo data
pub async fn seed(services: &Services) -> Result<()> {
    for (code, long_url) in SEED_URLS {
        services
            .urls
            .repository()
            .save(&ShortUrl::new(code, long_url))
            .await?;
    }

    for (email, password) in SEED_USERS {
        services
            .users
            .repository()
            .insert(&User::new(email, password))
            .await?;
    }

    info!(
        "Seeded {} short URLs and {} users",
        SEED_URLS.len(),
        SEED_USERS.len()
    );
    Ok(())
}
