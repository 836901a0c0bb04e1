//! Share link token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

/// Generates opaque URL-safe tokens for public share links.
///
/// Tokens are random, not derived from the file; uniqueness is enforced
/// by the store's unique constraint, and callers regenerate on conflict.
#[derive(Debug, Clone)]
pub struct ShareTokenGenerator;

impl ShareTokenGenerator {
    /// Creates a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates a random URL-safe token.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 16] = rng.random();
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

impl Default for ShareTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique_and_url_safe() {
        let generator = ShareTokenGenerator::new();
        let a = generator.generate();
        let b = generator.generate();

        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
