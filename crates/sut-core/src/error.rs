//! Core error types for sut-verify
//!
//! Two layers live here. [`DeviceError`] and [`PingError`] are what the
//! collaborators return. [`Failure`] is what a verification step records when
//! it gives up; its `Display` text is exactly what lands in the device's
//! diagnostic flag.

use std::time::Duration;

use sut_protocol::ProtocolError;
use thiserror::Error;

/// Errors from a remote call on a device session
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The agent did not answer in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The agent answered with a warning
    #[error("Agent error: {0}")]
    Agent(String),

    /// The agent answered with something we could not interpret
    #[error("Unexpected response to {command}: {response:?}")]
    UnexpectedResponse { command: String, response: String },

    /// The connection closed before a reply arrived
    #[error("Connection closed by device")]
    Disconnected,
}

/// Errors from a network presence check
#[derive(Error, Debug)]
pub enum PingError {
    /// The ping ran but got no answer
    #[error("No reply from {0}")]
    NoReply(String),

    /// The ping could not be run at all
    #[error("Failed to run ping: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Why a verification step failed
#[derive(Error, Debug)]
pub enum Failure {
    /// Device never answered a ping
    #[error("Unable to ping device after {attempts} retries")]
    Unreachable { attempts: u32 },

    /// No session could be established
    #[error("Unable to connect to device after {attempts} retries")]
    SessionUnavailable { attempts: u32 },

    /// An established session stopped responding
    #[error("Device session lost connection to device")]
    LivenessLost,

    /// Agent reports a version other than the expected one
    #[error("Unexpected agent version on device, got '{found}' expected '{expected}'")]
    VersionMismatch { found: String, expected: String },

    /// The agent update did not succeed
    #[error("Remote Device Error: agent update: {0}")]
    Update(#[from] UpdateFailure),

    /// The update reported a wrong version but a direct check now matches
    #[error(
        "Unexpected State: agent update found incorrect agent version after updating, \
         but it is correct now"
    )]
    ContradictoryUpdateState,

    /// Display resolution check failed
    #[error("{0}")]
    Screen(#[from] ScreenFailure),

    /// Removable storage check failed
    #[error("{0}")]
    Storage(#[from] StorageFailure),

    /// Cleanup routine did not report success
    #[error("Cleanup failed: {0}")]
    CleanupFailed(String),
}

impl Failure {
    /// Whether this failure is recorded in the device's diagnostic flag
    ///
    /// Cleanup routines own their diagnostics, so their failures are only
    /// logged.
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Failure::CleanupFailed(_))
    }
}

/// Failed agent update outcomes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateFailure {
    /// New agent package could not be fetched
    #[error("unable to download new agent package")]
    DownloadFailed,

    /// Version could not be read back after updating
    #[error("unable to re-verify that the agent was updated")]
    ReverifyFailed,

    /// Version read back after updating is wrong
    #[error("agent reports an unexpected version after updating")]
    ReverifyWrong,
}

/// Display resolution check failures
#[derive(Error, Debug)]
pub enum ScreenFailure {
    /// Device runs at the wrong resolution
    #[error("Unexpected screen on device, got '{found}' expected '{expected}'")]
    Mismatch { found: String, expected: String },

    /// Device refused to change its resolution
    #[error("Command to update resolution returned failure")]
    AdjustFailed,

    /// Remote call failed during the check
    #[error("Unknown error while checking screen resolution, see following error: {0}")]
    Transport(#[from] DeviceError),
}

/// Removable storage check failures
#[derive(Error, Debug)]
pub enum StorageFailure {
    /// Storage mount point is missing
    #[error("Mount of {0} does not seem to exist")]
    MountMissing(String),

    /// Test file could not be written
    #[error("Unable to write to {0}")]
    WriteFailed(String),

    /// Test file was not found after writing it
    #[error("Written tempfile doesn't exist on inspection")]
    VerifyFailed,

    /// Test file could not be removed
    #[error("Unable to cleanup from written tempfile")]
    DeleteFailed,

    /// Remote call failed during the check
    #[error(
        "Unknown error while testing ability to write to {mount}, see following error: {source}"
    )]
    Transport {
        mount: String,
        #[source]
        source: DeviceError,
    },
}
