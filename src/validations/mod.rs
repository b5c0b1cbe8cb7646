mod short_url;

pub use short_url::{validate_long_url, validate_short_code};
