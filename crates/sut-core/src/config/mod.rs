//! Compile-time configuration for sut-verify
//!
//! Every knob is a constant. [`VerifyConfig::default`] gathers them into one
//! value so the pipeline can be handed a different config in tests.

mod agent;
mod device;

pub use agent::AgentUpdateConfig;
pub use device::{CleanupConfig, ScreenConfig, StorageConfig, SCRATCH_PAYLOAD};

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Attempts made by the reachability and session steps
pub const MAX_RETRIES: u32 = 5;

/// Backoff between those attempts
pub const RETRY_DELAY: Duration = Duration::from_secs(90);

/// Directory holding one sub-directory per device
pub const FLAG_ROOT: &str = "/builds";

/// Name of the per-device diagnostic flag file
pub const FLAG_FILE_NAME: &str = "error.flg";

/// How long to wait for the TCP connection to the agent
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long to wait for a single agent reply
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// How long a single ping waits for its echo
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Full configuration for one verification run
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Root directory for diagnostic flags
    pub flag_root: PathBuf,

    /// TCP port of the device agent
    pub agent_port: u16,

    /// Connection timeout for the agent
    pub connect_timeout: Duration,

    /// Per-command timeout for the agent
    pub command_timeout: Duration,

    /// Per-attempt ping timeout
    pub ping_timeout: Duration,

    /// Retry policy for reachability and session establishment
    pub retry: RetryPolicy,

    /// Removable storage check settings
    pub storage: StorageConfig,

    /// Display resolution check settings
    pub screen: ScreenConfig,

    /// Agent update settings
    pub update: AgentUpdateConfig,

    /// Device cleanup settings
    pub cleanup: CleanupConfig,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            flag_root: PathBuf::from(FLAG_ROOT),
            agent_port: sut_protocol::DEFAULT_PORT,
            connect_timeout: CONNECT_TIMEOUT,
            command_timeout: COMMAND_TIMEOUT,
            ping_timeout: PING_TIMEOUT,
            retry: RetryPolicy::default(),
            storage: StorageConfig::default(),
            screen: ScreenConfig::default(),
            update: AgentUpdateConfig::default(),
            cleanup: CleanupConfig::default(),
        }
    }
}
