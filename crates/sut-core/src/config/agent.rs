//! Agent update configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Settings for replacing the agent on a device
#[derive(Debug, Clone)]
pub struct AgentUpdateConfig {
    /// Agent version the pool is expected to run
    pub target_version: String,

    /// Package name of the agent
    pub package: String,

    /// Local copy of the agent package
    pub local_package: PathBuf,

    /// Where the package is staged on the device before installing
    pub staged_package: String,

    /// Polling policy for reading the version back after installing.
    /// The initial delay gives the agent time to restart.
    pub reverify: RetryPolicy,
}

impl Default for AgentUpdateConfig {
    fn default() -> Self {
        Self {
            target_version: "1.13".to_string(),
            package: "com.mozilla.SUTAgentAndroid".to_string(),
            local_package: PathBuf::from("/builds/sut_tools/sutAgentAndroid.apk"),
            staged_package: "/mnt/sdcard/sutAgentAndroid.apk".to_string(),
            reverify: RetryPolicy::new(3, Duration::from_secs(30))
                .with_initial_delay(Duration::from_secs(30)),
        }
    }
}

impl AgentUpdateConfig {
    /// Version string the agent reports when it is up to date
    pub fn expected_version(&self) -> String {
        format!("SUTAgentAndroid Version {}", self.target_version)
    }
}
