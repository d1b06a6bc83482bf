//! Share link token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Generates opaque share link tokens.
#[derive(Debug, Clone)]
pub struct LinkService {
    /// Random bytes per token.
    token_bytes: usize,
}

impl LinkService {
    /// Creates a link service producing tokens backed by `token_bytes` random bytes.
    pub fn new(token_bytes: usize) -> Self {
        Self { token_bytes }
    }

    /// Generates a random, URL-safe token.
    pub fn generate_token(&self) -> String {
        let bytes: Vec<u8> = (0..self.token_bytes).map(|_| rand::random::<u8>()).collect();
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

impl Default for LinkService {
    fn default() -> Self {
        Self::new(24)
    }
}
