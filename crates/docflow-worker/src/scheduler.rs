//! Cron scheduler for periodic maintenance sweeps.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{info, warn};

use docflow_core::config::WorkerConfig;
use docflow_core::error::AppError;
use docflow_core::traits::{EffectQueue, SideEffect};

/// Cron-based scheduler for periodic background work.
pub struct CronScheduler {
    scheduler: JobScheduler,
    queue: Arc<dyn EffectQueue>,
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler enqueuing onto the given queue.
    pub async fn new(queue: Arc<dyn EffectQueue>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            queue,
            config,
        })
    }

    /// Register all periodic tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_archive_sweep().await?;
        info!("Scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Expired-document archival sweep, per the configured cron expression.
    async fn register_archive_sweep(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(self.config.archive_sweep_cron.as_str(), move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                if let Err(e) = queue.enqueue(SideEffect::ArchiveExpired).await {
                    warn!(error = %e, "Failed to enqueue expiry sweep");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Invalid archive sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to schedule expiry sweep: {e}")))?;

        Ok(())
    }
}
