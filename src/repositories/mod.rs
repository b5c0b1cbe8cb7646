mod session;
mod short_url;
mod user;

pub use session::{SessionRepository, SessionRepositoryTrait};
pub use short_url::{ShortUrlRepository, ShortUrlRepositoryTrait};
pub use user::{UserRepository, UserRepositoryTrait};

#[cfg(test)]
pub use short_url::MockShortUrlRepositoryTrait;
#[cfg(test)]
pub use user::MockUserRepositoryTrait;
