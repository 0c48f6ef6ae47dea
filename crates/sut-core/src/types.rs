//! Core domain types

use std::fmt;

/// Unique identifier for a test device
///
/// The identifier doubles as the device's network host name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(pub String);

impl DeviceId {
    /// Create a new device ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Result of an attempted agent update
///
/// The variants are mutually exclusive. Callers must match exhaustively so a
/// new outcome cannot be silently treated as one of the existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The agent now reports the expected version
    Success,
    /// The new agent package could not be fetched onto the device
    DownloadFailed,
    /// The agent version could not be read back after the update
    ReverifyFailed,
    /// The agent version was read back but is not the expected one
    ReverifyWrong,
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOutcome::Success => write!(f, "success"),
            UpdateOutcome::DownloadFailed => write!(f, "download failed"),
            UpdateOutcome::ReverifyFailed => write!(f, "reverify failed"),
            UpdateOutcome::ReverifyWrong => write!(f, "reverify wrong"),
        }
    }
}

/// Result code reported by a cleanup routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupCode {
    /// Device is in a clean state
    Success,
    /// Cleanup ran but could not restore a clean state
    Failed,
}

/// Display mode a device is expected to run in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenMode {
    /// Horizontal resolution in pixels
    pub width: u32,
    /// Vertical resolution in pixels
    pub height: u32,
    /// Display output type (e.g. `crt`, `hdmi`)
    pub kind: String,
}

impl ScreenMode {
    /// Create a new screen mode
    pub fn new(width: u32, height: u32, kind: impl Into<String>) -> Self {
        Self {
            width,
            height,
            kind: kind.into(),
        }
    }

    /// The mode as the agent reports it in `info screen`
    pub fn agent_format(&self) -> String {
        format!("X:{} Y:{}", self.width, self.height)
    }
}
