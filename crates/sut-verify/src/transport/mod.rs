//! TCP transport to the SUT agent

mod client;

pub use client::SutClient;

use std::time::Duration;

use async_trait::async_trait;

use sut_core::config::VerifyConfig;
use sut_core::traits::{DeviceSession, SessionConnector};
use sut_core::{DeviceError, DeviceId};

/// Opens [`SutClient`] sessions to devices by host name
#[derive(Debug, Clone)]
pub struct SutConnector {
    port: u16,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl SutConnector {
    pub fn new(port: u16, connect_timeout: Duration, command_timeout: Duration) -> Self {
        Self {
            port,
            connect_timeout,
            command_timeout,
        }
    }

    pub fn from_config(config: &VerifyConfig) -> Self {
        Self::new(
            config.agent_port,
            config.connect_timeout,
            config.command_timeout,
        )
    }

    /// Agent address for a device
    pub fn address(&self, device: &DeviceId) -> String {
        format!("{}:{}", device, self.port)
    }
}

#[async_trait]
impl SessionConnector for SutConnector {
    async fn connect(&self, device: &DeviceId) -> Result<Box<dyn DeviceSession>, DeviceError> {
        let client = SutClient::connect(
            self.address(device),
            self.connect_timeout,
            self.command_timeout,
        )
        .await?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_uses_agent_port() {
        let connector = SutConnector::from_config(&VerifyConfig::default());
        assert_eq!(
            connector.address(&DeviceId::from("tegra-042")),
            "tegra-042:20701"
        );
    }
}
