//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled maintenance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the expired-link sweep runs at all.
    #[serde(default = "default_true")]
    pub sweep_enabled: bool,
    /// Cron expression (with seconds) for the expired-link sweep.
    #[serde(default = "default_sweep_cron")]
    pub sweep_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            sweep_enabled: true,
            sweep_cron: default_sweep_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_cron() -> String {
    "0 */5 * * * *".to_string()
}
