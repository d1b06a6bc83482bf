//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use sharehub_core::config::WorkerConfig;
use sharehub_core::error::AppError;

use crate::jobs::ShareSweepJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Schedule settings
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, config })
    }

    /// Register all configured scheduled tasks
    pub async fn register_default_tasks(&self, sweep: ShareSweepJob) -> Result<(), AppError> {
        if self.config.sweep_enabled {
            self.register_share_sweep(sweep).await?;
        } else {
            tracing::info!("Share link sweep disabled");
        }

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Expired share link sweep, on the configured cron
    async fn register_share_sweep(&self, sweep: ShareSweepJob) -> Result<(), AppError> {
        let sweep = Arc::new(sweep);
        let job = CronJob::new_async(self.config.sweep_cron.as_str(), move |_uuid, _lock| {
            let sweep = Arc::clone(&sweep);
            Box::pin(async move {
                tracing::debug!("Running share link sweep");
                let report = sweep.run().await;
                tracing::debug!(swept = report.swept, "Share link sweep finished");
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid share sweep schedule '{}': {}",
                self.config.sweep_cron, e
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add share_sweep schedule: {}", e))
        })?;

        tracing::info!(cron = %self.config.sweep_cron, "Registered: share_sweep");
        Ok(())
    }
}
