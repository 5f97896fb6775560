//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Settings for the side-effect worker and scheduled sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Capacity of the in-process side-effect queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Cron expression for the expired-document archival sweep.
    #[serde(default = "default_archive_sweep_cron")]
    pub archive_sweep_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            archive_sweep_cron: default_archive_sweep_cron(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_archive_sweep_cron() -> String {
    // Hourly, on the hour.
    "0 0 * * * *".to_string()
}
