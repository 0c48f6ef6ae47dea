//! In-memory collaborators for pipeline tests

use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use sut_core::error::PingError;
use sut_core::traits::{
    AgentUpdater, CleanupRoutine, DeviceSession, FlagWriter, Pinger, SessionConnector,
};
use sut_core::{CleanupCode, DeviceError, DeviceId, ScreenMode, UpdateOutcome};

use crate::context::{ActiveSession, DeviceContext};

pub const EXPECTED_VERSION: &str = "SUTAgentAndroid Version 1.13";

/// Flag writer that remembers every message in order
#[derive(Clone, Default)]
pub struct RecordingFlag {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingFlag {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl FlagWriter for RecordingFlag {
    fn set_flag(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Context for `tegra-test` that records its flags
pub fn context() -> (DeviceContext, RecordingFlag) {
    let flag = RecordingFlag::default();
    let ctx = DeviceContext::new(DeviceId::from("tegra-test"), Box::new(flag.clone()));
    (ctx, flag)
}

/// Scriptable device state shared between a fake session and the test
pub struct FakeDevice {
    /// Reply to `current_time`; `None` makes the call fail
    pub clock: Option<String>,
    pub version: String,
    pub dirs: HashSet<String>,
    pub files: HashSet<String>,
    pub push_ok: bool,
    /// Whether a successful push actually leaves the file behind
    pub keep_pushed: bool,
    pub remove_ok: bool,
    pub screen: String,
    pub adjust_ok: bool,
    /// Payload of the last push
    pub pushed: Vec<u8>,
    /// Method that fails with a transport error
    pub fail_on: Option<&'static str>,
    /// Every session method called, with its argument
    pub calls: Vec<String>,
}

impl FakeDevice {
    pub fn healthy() -> Self {
        Self {
            clock: Some("1320951845123".to_string()),
            version: EXPECTED_VERSION.to_string(),
            dirs: HashSet::from(["/mnt/sdcard".to_string()]),
            files: HashSet::new(),
            push_ok: true,
            keep_pushed: true,
            remove_ok: true,
            screen: "X:1024 Y:768".to_string(),
            adjust_ok: true,
            pushed: Vec::new(),
            fail_on: None,
            calls: Vec::new(),
        }
    }

    pub fn shared(self) -> Arc<Mutex<FakeDevice>> {
        Arc::new(Mutex::new(self))
    }
}

pub fn calls(device: &Arc<Mutex<FakeDevice>>) -> Vec<String> {
    device.lock().unwrap().calls.clone()
}

/// Session backed by a [`FakeDevice`]
pub struct FakeSession {
    device: Arc<Mutex<FakeDevice>>,
}

impl FakeSession {
    pub fn new(device: Arc<Mutex<FakeDevice>>) -> Self {
        Self { device }
    }

    fn call(
        &self,
        method: &'static str,
        arg: &str,
    ) -> Result<MutexGuard<'_, FakeDevice>, DeviceError> {
        let mut device = self.device.lock().unwrap();
        device.calls.push(format!("{} {}", method, arg).trim_end().to_string());
        if device.fail_on == Some(method) {
            return Err(DeviceError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "injected fault",
            )));
        }
        Ok(device)
    }

    fn push(&self, remote: &str, data: &[u8]) -> Result<bool, DeviceError> {
        let mut device = self.call("push", remote)?;
        if !device.push_ok {
            return Ok(false);
        }
        device.pushed = data.to_vec();
        if device.keep_pushed {
            device.files.insert(remote.to_string());
        }
        Ok(true)
    }
}

/// Active session over a fake device
pub fn active<'a>(ctx: &'a DeviceContext, device: &Arc<Mutex<FakeDevice>>) -> ActiveSession<'a> {
    ActiveSession::new(ctx, Box::new(FakeSession::new(device.clone())))
}

#[async_trait]
impl DeviceSession for FakeSession {
    async fn current_time(&mut self) -> Result<String, DeviceError> {
        let device = self.call("clok", "")?;
        device
            .clock
            .clone()
            .ok_or(DeviceError::Timeout(Duration::from_secs(60)))
    }

    async fn agent_version(&mut self) -> Result<String, DeviceError> {
        Ok(self.call("ver", "")?.version.clone())
    }

    async fn dir_exists(&mut self, path: &str) -> Result<bool, DeviceError> {
        Ok(self.call("isdir", path)?.dirs.contains(path))
    }

    async fn file_exists(&mut self, path: &str) -> Result<bool, DeviceError> {
        Ok(self.call("exists", path)?.files.contains(path))
    }

    async fn push_file(&mut self, _local: &Path, remote: &str) -> Result<bool, DeviceError> {
        self.push(remote, &[])
    }

    async fn push_data(&mut self, data: &[u8], remote: &str) -> Result<bool, DeviceError> {
        self.push(remote, data)
    }

    async fn remove_file(&mut self, path: &str) -> Result<bool, DeviceError> {
        let mut device = self.call("rm", path)?;
        if !device.remove_ok {
            return Ok(false);
        }
        device.files.remove(path);
        Ok(true)
    }

    async fn remove_dir(&mut self, path: &str) -> Result<bool, DeviceError> {
        let mut device = self.call("rmdr", path)?;
        if !device.remove_ok {
            return Ok(false);
        }
        device.dirs.remove(path);
        Ok(true)
    }

    async fn screen_info(&mut self) -> Result<String, DeviceError> {
        Ok(self.call("screen", "")?.screen.clone())
    }

    async fn adjust_resolution(&mut self, mode: &ScreenMode) -> Result<bool, DeviceError> {
        Ok(self.call("adjust", &mode.agent_format())?.adjust_ok)
    }

    async fn reboot(&mut self) -> Result<(), DeviceError> {
        drop(self.call("rebt", "")?);
        Ok(())
    }

    async fn install_agent(&mut self, package: &str, _staged: &str) -> Result<bool, DeviceError> {
        drop(self.call("updt", package)?);
        Ok(true)
    }

    async fn kill_process(&mut self, name: &str) -> Result<bool, DeviceError> {
        drop(self.call("kill", name)?);
        Ok(true)
    }
}

/// Pinger that fails a fixed number of times before answering
#[derive(Clone, Default)]
pub struct FakePinger {
    pub fail_first: u32,
    pub calls: Arc<AtomicU32>,
}

impl FakePinger {
    pub fn failing(fail_first: u32) -> Self {
        Self {
            fail_first,
            calls: Arc::default(),
        }
    }

    pub fn count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pinger for FakePinger {
    async fn ping(&self, device: &DeviceId) -> Result<(), PingError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.fail_first {
            return Err(PingError::NoReply(device.to_string()));
        }
        Ok(())
    }
}

/// Connector that fails a fixed number of times, then hands out fake sessions
#[derive(Clone)]
pub struct FakeConnector {
    pub fail_first: u32,
    pub device: Arc<Mutex<FakeDevice>>,
    pub calls: Arc<AtomicU32>,
}

impl FakeConnector {
    pub fn new(device: Arc<Mutex<FakeDevice>>, fail_first: u32) -> Self {
        Self {
            fail_first,
            device,
            calls: Arc::default(),
        }
    }

    pub fn count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionConnector for FakeConnector {
    async fn connect(&self, _device: &DeviceId) -> Result<Box<dyn DeviceSession>, DeviceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.fail_first {
            return Err(DeviceError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(Box::new(FakeSession::new(self.device.clone())))
    }
}

/// Updater that reports a fixed outcome
///
/// When `installs` is set the fake device's version is replaced before the
/// outcome is reported, whatever that outcome claims.
#[derive(Clone)]
pub struct FakeUpdater {
    pub outcome: UpdateOutcome,
    pub device: Arc<Mutex<FakeDevice>>,
    pub installs: Option<String>,
    pub calls: Arc<AtomicU32>,
}

impl FakeUpdater {
    pub fn new(device: Arc<Mutex<FakeDevice>>, outcome: UpdateOutcome) -> Self {
        Self {
            outcome,
            device,
            installs: None,
            calls: Arc::default(),
        }
    }

    pub fn installing(mut self, version: &str) -> Self {
        self.installs = Some(version.to_string());
        self
    }

    pub fn count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentUpdater for FakeUpdater {
    fn expected_version(&self) -> String {
        EXPECTED_VERSION.to_string()
    }

    async fn update(&self, _session: &mut dyn DeviceSession) -> UpdateOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(version) = &self.installs {
            self.device.lock().unwrap().version = version.clone();
        }
        self.outcome
    }
}

/// Cleanup routine with a canned result
#[derive(Clone)]
pub struct FakeCleanup {
    /// `None` makes the routine fail with a transport error
    pub code: Option<CleanupCode>,
    pub calls: Arc<AtomicU32>,
}

impl FakeCleanup {
    pub fn returning(code: Option<CleanupCode>) -> Self {
        Self {
            code,
            calls: Arc::default(),
        }
    }

    pub fn count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CleanupRoutine for FakeCleanup {
    async fn run(&self, _session: &mut dyn DeviceSession) -> Result<CleanupCode, DeviceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.code.ok_or(DeviceError::Disconnected)
    }
}
