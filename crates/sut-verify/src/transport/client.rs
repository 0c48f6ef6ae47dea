//! SUT agent client
//!
//! Wraps a framed TCP stream and implements [`DeviceSession`] on top of the
//! agent's command set. The agent restarts itself on update and reboot, so
//! any transport failure drops the stream and the next command dials again.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;

use sut_core::traits::DeviceSession;
use sut_core::{DeviceError, ScreenMode};
use sut_protocol::{Response, SutCodec, SutCommand};

type AgentStream = Framed<TcpStream, SutCodec>;

/// Session with the agent on one device
pub struct SutClient {
    address: String,
    connect_timeout: Duration,
    command_timeout: Duration,
    stream: Option<AgentStream>,
}

impl SutClient {
    /// Connect to the agent at `address` and wait for its prompt
    pub async fn connect(
        address: impl Into<String>,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Result<Self, DeviceError> {
        let mut client = Self {
            address: address.into(),
            connect_timeout,
            command_timeout,
            stream: None,
        };
        client.ensure_connected().await?;
        Ok(client)
    }

    /// Whether a stream is currently open
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn ensure_connected(&mut self) -> Result<&mut AgentStream, DeviceError> {
        if self.stream.is_none() {
            self.stream = Some(self.open().await?);
        }
        self.stream.as_mut().ok_or(DeviceError::Disconnected)
    }

    async fn open(&self) -> Result<AgentStream, DeviceError> {
        tracing::debug!("Connecting to agent at {}", self.address);

        let stream = timeout(self.connect_timeout, TcpStream::connect(&self.address))
            .await
            .map_err(|_| DeviceError::Timeout(self.connect_timeout))??;
        let mut framed = Framed::new(stream, SutCodec::new());

        // The agent greets every connection with a bare prompt
        let greeting = timeout(self.command_timeout, framed.next())
            .await
            .map_err(|_| DeviceError::Timeout(self.command_timeout))?
            .ok_or(DeviceError::Disconnected)??;
        tracing::trace!("Agent greeting: {:?}", greeting.body());

        Ok(framed)
    }

    /// Send a command and wait for its reply, dropping the stream on failure
    async fn send(&mut self, command: SutCommand) -> Result<Response, DeviceError> {
        let verb = command.verb();
        let limit = self.command_timeout;

        let result = match self.ensure_connected().await {
            Ok(stream) => timeout(limit, round_trip(stream, command))
                .await
                .unwrap_or(Err(DeviceError::Timeout(limit))),
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                tracing::debug!("{} <- {:?}", verb, response.body());
                Ok(response)
            }
            Err(e) => {
                tracing::debug!("{} failed, dropping connection: {}", verb, e);
                self.stream = None;
                Err(e)
            }
        }
    }

    /// Send a command whose reply is data; an agent warning is an error
    async fn query(&mut self, command: SutCommand) -> Result<Response, DeviceError> {
        let response = self.send(command).await?;
        match response.warning() {
            Some(warning) => Err(DeviceError::Agent(warning.to_string())),
            None => Ok(response),
        }
    }

    /// Send a command whose reply only signals success or an agent warning
    async fn send_checked(&mut self, command: SutCommand) -> Result<bool, DeviceError> {
        let verb = command.verb();
        let response = self.send(command).await?;
        if let Some(warning) = response.warning() {
            tracing::warn!("Agent rejected {}: {}", verb, warning);
            return Ok(false);
        }
        Ok(true)
    }

    /// Send a command that makes the agent go away
    ///
    /// Losing the connection while waiting is the expected outcome, so only
    /// agent warnings and protocol errors are reported. The stream is always
    /// dropped.
    async fn send_disruptive(&mut self, command: SutCommand) -> Result<bool, DeviceError> {
        let verb = command.verb();
        let result = self.send(command).await;
        self.stream = None;

        match result {
            Ok(response) => match response.warning() {
                Some(warning) => {
                    tracing::warn!("Agent rejected {}: {}", verb, warning);
                    Ok(false)
                }
                None => Ok(true),
            },
            Err(DeviceError::Protocol(e)) => Err(DeviceError::Protocol(e)),
            Err(e) => {
                tracing::debug!("Agent went away during {}: {}", verb, e);
                Ok(true)
            }
        }
    }
}

async fn round_trip(
    stream: &mut AgentStream,
    command: SutCommand,
) -> Result<Response, DeviceError> {
    stream.send(command).await?;
    match stream.next().await {
        Some(reply) => Ok(reply?),
        None => Err(DeviceError::Disconnected),
    }
}

fn split_path(path: &str) -> (&str, &str) {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", name)) => ("/", name),
        Some((parent, name)) => (parent, name),
        None => (".", path),
    }
}

#[async_trait]
impl DeviceSession for SutClient {
    async fn current_time(&mut self) -> Result<String, DeviceError> {
        Ok(self.query(SutCommand::Clock).await?.into_body())
    }

    async fn agent_version(&mut self) -> Result<String, DeviceError> {
        Ok(self.query(SutCommand::Version).await?.into_body())
    }

    async fn dir_exists(&mut self, path: &str) -> Result<bool, DeviceError> {
        let response = self.query(SutCommand::IsDir(path.to_string())).await?;
        response
            .as_bool()
            .ok_or_else(|| DeviceError::UnexpectedResponse {
                command: format!("isdir {}", path),
                response: response.into_body(),
            })
    }

    async fn file_exists(&mut self, path: &str) -> Result<bool, DeviceError> {
        let (parent, name) = split_path(path);
        if !self.dir_exists(parent).await? {
            return Ok(false);
        }
        let listing = self.query(SutCommand::List(parent.to_string())).await?;
        let found = listing.entries().any(|entry| entry == name);
        Ok(found)
    }

    async fn push_file(&mut self, local: &Path, remote: &str) -> Result<bool, DeviceError> {
        let data = tokio::fs::read(local).await?;
        tracing::debug!("Pushing {:?} to {}", local, remote);
        self.push_data(&data, remote).await
    }

    async fn push_data(&mut self, data: &[u8], remote: &str) -> Result<bool, DeviceError> {
        tracing::debug!("Pushing {} bytes to {}", data.len(), remote);
        self.send_checked(SutCommand::Push {
            path: remote.to_string(),
            data: Bytes::copy_from_slice(data),
        })
        .await
    }

    async fn remove_file(&mut self, path: &str) -> Result<bool, DeviceError> {
        self.send_checked(SutCommand::Remove(path.to_string())).await
    }

    async fn remove_dir(&mut self, path: &str) -> Result<bool, DeviceError> {
        self.send_checked(SutCommand::RemoveDir(path.to_string())).await
    }

    async fn screen_info(&mut self) -> Result<String, DeviceError> {
        let response = self.query(SutCommand::Info("screen".to_string())).await?;
        let value = response.info_values("screen").next().map(str::to_string);
        value.ok_or_else(|| DeviceError::UnexpectedResponse {
            command: "info screen".to_string(),
            response: response.into_body(),
        })
    }

    async fn adjust_resolution(&mut self, mode: &ScreenMode) -> Result<bool, DeviceError> {
        let property = format!("persist.tegra.dpy{}.mode", mode.kind);
        for (axis, value) in [("width", mode.width), ("height", mode.height)] {
            let command = SutCommand::Exec(format!("setprop {}.{} {}", property, axis, value));
            if !self.send_checked(command).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn reboot(&mut self) -> Result<(), DeviceError> {
        if self.send_disruptive(SutCommand::Reboot).await? {
            Ok(())
        } else {
            Err(DeviceError::Agent("reboot rejected".to_string()))
        }
    }

    async fn install_agent(&mut self, package: &str, staged: &str) -> Result<bool, DeviceError> {
        self.send_disruptive(SutCommand::Update {
            package: package.to_string(),
            apk: staged.to_string(),
        })
        .await
    }

    async fn kill_process(&mut self, name: &str) -> Result<bool, DeviceError> {
        self.send_checked(SutCommand::Kill(name.to_string())).await
    }
}
