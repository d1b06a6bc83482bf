//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod chat;
pub mod logging;
pub mod realtime;
pub mod share;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::chat::ChatConfig;
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;
pub use self::share::ShareConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay + `SHAREHUB__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Share link settings.
    #[serde(default)]
    pub share: ShareConfig,
    /// Broadcast hub settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Chat log settings.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default` with an environment-specific overlay and
    /// environment variables prefixed with `SHAREHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SHAREHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Rejects combinations that would make the core misbehave at runtime.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.share.default_ttl_hours == 0 {
            return Err(AppError::configuration(
                "share.default_ttl_hours must be greater than zero",
            ));
        }
        if self.share.default_ttl_hours > self.share.max_ttl_hours {
            return Err(AppError::configuration(
                "share.default_ttl_hours must not exceed share.max_ttl_hours",
            ));
        }
        if self.share.token_bytes < 16 {
            return Err(AppError::configuration(
                "share.token_bytes must be at least 16",
            ));
        }
        if self.realtime.subscriber_queue_capacity == 0 {
            return Err(AppError::configuration(
                "realtime.subscriber_queue_capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}
