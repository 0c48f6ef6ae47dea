//! Device session traits

use std::path::Path;

use async_trait::async_trait;

use crate::error::DeviceError;
use crate::types::{DeviceId, ScreenMode};

/// An established remote-control connection to a device
///
/// Methods that answer a yes/no question return `Ok(false)` for a clean
/// negative answer and `Err` when the question could not be asked.
#[async_trait]
pub trait DeviceSession: Send {
    /// Device clock, as reported by the agent
    async fn current_time(&mut self) -> Result<String, DeviceError>;

    /// Full agent version string
    async fn agent_version(&mut self) -> Result<String, DeviceError>;

    /// Whether a directory exists
    async fn dir_exists(&mut self, path: &str) -> Result<bool, DeviceError>;

    /// Whether a file exists
    async fn file_exists(&mut self, path: &str) -> Result<bool, DeviceError>;

    /// Copy a local file onto the device
    async fn push_file(&mut self, local: &Path, remote: &str) -> Result<bool, DeviceError>;

    /// Write `data` to a file on the device
    async fn push_data(&mut self, data: &[u8], remote: &str) -> Result<bool, DeviceError>;

    /// Remove a file
    async fn remove_file(&mut self, path: &str) -> Result<bool, DeviceError>;

    /// Remove a directory and its contents
    async fn remove_dir(&mut self, path: &str) -> Result<bool, DeviceError>;

    /// Current display resolution, in the agent's `X:<w> Y:<h>` format
    async fn screen_info(&mut self) -> Result<String, DeviceError>;

    /// Ask the device to switch display mode; takes effect after a reboot
    async fn adjust_resolution(&mut self, mode: &ScreenMode) -> Result<bool, DeviceError>;

    /// Reboot the device
    async fn reboot(&mut self) -> Result<(), DeviceError>;

    /// Install an agent package that is already on the device
    async fn install_agent(&mut self, package: &str, staged: &str) -> Result<bool, DeviceError>;

    /// Kill a process by name
    async fn kill_process(&mut self, name: &str) -> Result<bool, DeviceError>;
}

/// Opens sessions to devices
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Make a single connection attempt
    async fn connect(&self, device: &DeviceId) -> Result<Box<dyn DeviceSession>, DeviceError>;
}
