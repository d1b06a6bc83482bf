//! Broadcast hub configuration.

use serde::{Deserialize, Serialize};

/// Broadcast hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound queue capacity per subscriber. A subscriber whose queue
    /// is full when a broadcast arrives is dropped.
    #[serde(default = "default_queue_capacity")]
    pub subscriber_queue_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            subscriber_queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    256
}
