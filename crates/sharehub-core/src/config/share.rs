//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Share link generation and lifetime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Lifetime applied when the creator does not pick one.
    #[serde(default = "default_ttl_hours")]
    pub default_ttl_hours: u64,
    /// Upper bound on any requested lifetime.
    #[serde(default = "default_max_ttl_hours")]
    pub max_ttl_hours: u64,
    /// Number of random bytes behind each token.
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
    /// How many times token generation is retried on collision.
    #[serde(default = "default_max_token_attempts")]
    pub max_token_attempts: u32,
    /// Base URL prepended to tokens when rendering share URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            default_ttl_hours: default_ttl_hours(),
            max_ttl_hours: default_max_ttl_hours(),
            token_bytes: default_token_bytes(),
            max_token_attempts: default_max_token_attempts(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    24 * 7
}

fn default_max_ttl_hours() -> u64 {
    24 * 30
}

fn default_token_bytes() -> usize {
    24
}

fn default_max_token_attempts() -> u32 {
    8
}

fn default_public_base_url() -> String {
    "http://localhost:8000/api/files/shared".to_string()
}
