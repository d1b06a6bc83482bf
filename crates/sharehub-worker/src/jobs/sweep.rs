//! Expired share link sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing;

use sharehub_service::share::ShareService;

/// Result of one sweep pass
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Links marked inactive
    pub swept: usize,
    /// When the pass ran
    pub ran_at: DateTime<Utc>,
}

/// Marks expired share links inactive
#[derive(Debug, Clone)]
pub struct ShareSweepJob {
    /// Share service
    share: Arc<ShareService>,
}

impl ShareSweepJob {
    /// Create a new sweep job
    pub fn new(share: Arc<ShareService>) -> Self {
        Self { share }
    }

    /// Run one sweep pass
    pub async fn run(&self) -> SweepReport {
        let ran_at = Utc::now();
        let swept = self.share.sweep_expired_links().await;

        if swept > 0 {
            tracing::info!(swept, "Expired share links deactivated");
        } else {
            tracing::debug!("No expired share links to sweep");
        }

        SweepReport { swept, ran_at }
    }
}
