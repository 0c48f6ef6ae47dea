//! Returns a device to a clean state between jobs

use async_trait::async_trait;

use sut_core::config::CleanupConfig;
use sut_core::traits::{CleanupRoutine, DeviceSession};
use sut_core::{CleanupCode, DeviceError};

/// Kills leftover test processes and removes leftover test data
#[derive(Debug, Clone)]
pub struct DeviceCleanup {
    config: CleanupConfig,
}

impl DeviceCleanup {
    pub fn new(config: CleanupConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CleanupRoutine for DeviceCleanup {
    async fn run(&self, session: &mut dyn DeviceSession) -> Result<CleanupCode, DeviceError> {
        for process in &self.config.stale_processes {
            if session.kill_process(process).await? {
                tracing::debug!("Killed {}", process);
            } else {
                tracing::debug!("{} not running or could not be killed", process);
            }
        }

        let mut code = CleanupCode::Success;
        for dir in &self.config.leftover_dirs {
            if !session.dir_exists(dir).await? {
                continue;
            }
            tracing::info!("Removing leftover {}", dir);
            if !session.remove_dir(dir).await? {
                tracing::error!("Unable to remove {}", dir);
                code = CleanupCode::Failed;
            }
        }

        Ok(code)
    }
}
