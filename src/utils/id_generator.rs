use rand::{rng, Rng};

/// Alphabet short codes are drawn from (0-9, A-Z, a-z)
const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default number of characters in a generated short code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Source of candidate short codes.
///
/// Implementations make no uniqueness promise; callers are responsible for
/// checking a candidate against the store.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Generates codes of a fixed length with every character drawn uniformly
/// from the 62-symbol alphanumeric alphabet.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_short_id(self.length)
    }
}

/// Generates a random base62 character
pub fn random_base62_char() -> char {
    let idx = rng().random_range(0..CHARSET.len());
    CHARSET[idx] as char
}

/// Generates a random short ID of exactly `length` base62 characters
pub fn generate_short_id(length: usize) -> String {
    (0..length).map(|_| random_base62_char()).collect()
}

/// Returns true if `code` looks like something this generator could produce
pub fn is_short_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_has_requested_length() {
        assert_eq!(generate_short_id(6).len(), 6);
        assert_eq!(generate_short_id(12).len(), 12);
        assert!(generate_short_id(0).is_empty());
    }

    #[test]
    fn test_generate_uses_alphanumeric_alphabet() {
        for _ in 0..200 {
            let code = RandomCodeGenerator::default().generate();
            assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
            assert!(is_short_code(&code), "unexpected code {}", code);
        }
    }

    #[test]
    fn test_generate_is_random() {
        let generator = RandomCodeGenerator::new(8);
        let codes: HashSet<String> = (0..100).map(|_| generator.generate()).collect();
        // 62^8 possibilities; 100 draws colliding would point at a broken RNG
        assert_eq!(codes.len(), 100);
    }

    #[test]
    fn test_every_symbol_is_reachable() {
        let seen: HashSet<char> = (0..20_000).map(|_| random_base62_char()).collect();
        assert_eq!(seen.len(), CHARSET.len());
    }

    #[test]
    fn test_is_short_code() {
        assert!(is_short_code("b2xVn2"));
        assert!(!is_short_code(""));
        assert!(!is_short_code("ab-123"));
        assert!(!is_short_code("ab/123"));
    }
}
