use url::Url;
use validator::ValidationError;

use crate::utils::id_generator::is_short_code;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates that a long URL is present, absolute, and uses http/https
pub fn validate_long_url(url_str: &str) -> Result<(), ValidationError> {
    if url_str.trim().is_empty() {
        return Err(error("long_url_empty", "URL must not be empty"));
    }

    match Url::parse(url_str.trim()) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(error("long_url_scheme", "URL scheme must be http or https"));
            }

            if url.host().is_none() {
                return Err(error("long_url_host", "URL must have a host"));
            }

            Ok(())
        }
        Err(_) => Err(error("long_url_format", "Invalid URL format")),
    }
}

/// Validates a short code taken from a request path
pub fn validate_short_code(code: &str) -> Result<(), ValidationError> {
    if !is_short_code(code) {
        return Err(error(
            "short_code_format",
            "Short codes only contain letters and digits",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_long_url() {
        // Valid URLs
        assert!(validate_long_url("https://example.com").is_ok());
        assert!(validate_long_url("http://www.lighthouselabs.ca").is_ok());
        assert!(validate_long_url("http://example.com/path?query=value").is_ok());

        // Invalid URLs
        assert!(validate_long_url("").is_err());
        assert!(validate_long_url("   ").is_err());
        assert!(validate_long_url("not-a-url").is_err());
        assert!(validate_long_url("ftp://example.com").is_err());
        assert!(validate_long_url("mailto:user@example.com").is_err());
    }

    #[test]
    fn test_empty_url_has_message() {
        let err = validate_long_url("").unwrap_err();
        assert_eq!(err.code, "long_url_empty");
        assert_eq!(err.message.as_deref(), Some("URL must not be empty"));
    }

    #[test]
    fn test_validate_short_code() {
        assert!(validate_short_code("9sm5xK").is_ok());
        assert!(validate_short_code("").is_err());
        assert!(validate_short_code("abc 12").is_err());
    }
}
