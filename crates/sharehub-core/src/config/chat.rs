//! Chat log configuration.

use serde::{Deserialize, Serialize};

/// Chat message log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum message body length in characters.
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,
    /// Display name used when the author name is blank.
    #[serde(default = "default_anonymous_name")]
    pub anonymous_name: String,
    /// Display name attached to system notices.
    #[serde(default = "default_system_name")]
    pub system_name: String,
    /// Notice seeded into a fresh log. `None` starts the log empty.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: Option<String>,
    /// Notice injected when the log is wiped without retaining system messages.
    #[serde(default = "default_clear_notice")]
    pub clear_notice: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_body_chars: default_max_body_chars(),
            anonymous_name: default_anonymous_name(),
            system_name: default_system_name(),
            welcome_message: default_welcome_message(),
            clear_notice: default_clear_notice(),
        }
    }
}

fn default_max_body_chars() -> usize {
    4000
}

fn default_anonymous_name() -> String {
    "anonymous".to_string()
}

fn default_system_name() -> String {
    "system".to_string()
}

fn default_welcome_message() -> Option<String> {
    Some("Welcome to the family chat room!".to_string())
}

fn default_clear_notice() -> String {
    "Chat history was cleared".to_string()
}
