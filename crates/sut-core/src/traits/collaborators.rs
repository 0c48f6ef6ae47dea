//! Traits for the collaborators the pipeline delegates to

use async_trait::async_trait;

use crate::error::{DeviceError, PingError};
use crate::traits::DeviceSession;
use crate::types::{CleanupCode, DeviceId, UpdateOutcome};

/// Network-level presence check
#[async_trait]
pub trait Pinger: Send + Sync {
    /// Ping the device once
    async fn ping(&self, device: &DeviceId) -> Result<(), PingError>;
}

/// Replaces the agent on a device
#[async_trait]
pub trait AgentUpdater: Send + Sync {
    /// Version string an up-to-date agent reports
    fn expected_version(&self) -> String;

    /// Update the agent and report how it went
    async fn update(&self, session: &mut dyn DeviceSession) -> UpdateOutcome;
}

/// Puts a device back into a clean state before a job
#[async_trait]
pub trait CleanupRoutine: Send + Sync {
    /// Run the cleanup
    async fn run(&self, session: &mut dyn DeviceSession) -> Result<CleanupCode, DeviceError>;
}

/// Records a device's diagnostic flag
///
/// Writing is best effort: a flag that cannot be written is logged by the
/// implementation and never fails the caller.
pub trait FlagWriter: Send + Sync {
    /// Replace the flag's content with `message`
    fn set_flag(&self, message: &str);
}
