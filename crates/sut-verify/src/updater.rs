//! Agent self-update over an existing session

use async_trait::async_trait;

use sut_core::config::AgentUpdateConfig;
use sut_core::traits::{AgentUpdater, DeviceSession};
use sut_core::UpdateOutcome;

/// Installs the agent package shipped alongside the tool
///
/// The package is pushed to the device, handed to the agent's installer,
/// and the version is read back once the agent has restarted.
#[derive(Debug, Clone)]
pub struct SutAgentUpdater {
    config: AgentUpdateConfig,
}

impl SutAgentUpdater {
    pub fn new(config: AgentUpdateConfig) -> Self {
        Self { config }
    }

    async fn stage(&self, session: &mut dyn DeviceSession) -> bool {
        let local = &self.config.local_package;
        if !local.is_file() {
            tracing::warn!("Agent package {:?} not found", local);
            return false;
        }

        match session.push_file(local, &self.config.staged_package).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!("Device refused {}", self.config.staged_package);
                false
            }
            Err(e) => {
                tracing::warn!("Failed to push agent package: {}", e);
                false
            }
        }
    }

    async fn install(&self, session: &mut dyn DeviceSession) {
        let result = session
            .install_agent(&self.config.package, &self.config.staged_package)
            .await;
        match result {
            Ok(true) => tracing::info!("Installer started for {}", self.config.package),
            Ok(false) => tracing::warn!("Installer rejected {}", self.config.staged_package),
            // The agent restarting mid-reply looks like this
            Err(e) => tracing::debug!("Install request ended with: {}", e),
        }
    }

    /// Poll the version until the restarted agent answers
    async fn read_back(&self, session: &mut dyn DeviceSession) -> Option<String> {
        let policy = &self.config.reverify;
        let attempts = policy.attempts();

        for attempt in 1..=attempts {
            let delay = policy.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match session.agent_version().await {
                Ok(version) => return Some(version),
                Err(e) => tracing::debug!(
                    "Version read-back attempt {}/{} failed: {}",
                    attempt,
                    attempts,
                    e
                ),
            }
        }
        None
    }
}

#[async_trait]
impl AgentUpdater for SutAgentUpdater {
    fn expected_version(&self) -> String {
        self.config.expected_version()
    }

    async fn update(&self, session: &mut dyn DeviceSession) -> UpdateOutcome {
        if !self.stage(session).await {
            return UpdateOutcome::DownloadFailed;
        }

        self.install(session).await;

        match self.read_back(session).await {
            None => UpdateOutcome::ReverifyFailed,
            Some(version) if version == self.expected_version() => UpdateOutcome::Success,
            Some(version) => {
                tracing::warn!("Agent reports '{}' after updating", version);
                UpdateOutcome::ReverifyWrong
            }
        }
    }
}
