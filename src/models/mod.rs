mod session;
mod short_url;
mod user;

pub use session::{FlashKind, Flashes, SessionState};
pub use short_url::{CreateShortUrlForm, ShortUrl, UpdateShortUrlForm};
pub use user::{CredentialsForm, User};
