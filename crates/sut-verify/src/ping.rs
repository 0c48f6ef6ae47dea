//! ICMP presence check via the system `ping` binary

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use sut_core::error::PingError;
use sut_core::traits::Pinger;
use sut_core::DeviceId;

/// Pings a device once with the system `ping` command
#[derive(Debug, Clone)]
pub struct SystemPinger {
    program: String,
    timeout: Duration,
}

impl SystemPinger {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "ping".to_string(),
            timeout,
        }
    }

    /// Use a different executable in place of `ping`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl Pinger for SystemPinger {
    async fn ping(&self, device: &DeviceId) -> Result<(), PingError> {
        // -W takes whole seconds
        let wait = self.timeout.as_secs().max(1).to_string();

        let status = Command::new(&self.program)
            .args(["-c", "1", "-W", wait.as_str(), device.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(PingError::NoReply(device.to_string()))
        }
    }
}
