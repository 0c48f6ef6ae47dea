//! Verification pipeline
//!
//! Runs the checks in a fixed order and stops at the first one that fails:
//!
//! ```text
//! reachability -> session -> version -> [update] -> [screen] -> storage -> cleanup
//! ```
//!
//! The update step only runs when the version check fails, and the screen
//! step only when it is enabled in the config. The pipeline looks at nothing
//! but each step's pass/fail result; the reasons are already in the flag.

use std::fmt;

use sut_core::config::VerifyConfig;
use sut_core::traits::{AgentUpdater, CleanupRoutine, Pinger, SessionConnector};
use sut_core::DeviceId;

use crate::checks::{
    check_reachability, check_screen, check_version, establish_session, run_cleanup,
    update_agent, validate_storage,
};
use crate::context::{ActiveSession, DeviceContext};
use crate::device_cleanup::DeviceCleanup;
use crate::ping::SystemPinger;
use crate::transport::SutConnector;
use crate::updater::SutAgentUpdater;

/// A stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Reachability,
    Session,
    Version,
    Update,
    Screen,
    Storage,
    Cleanup,
}

impl Step {
    /// Every step in execution order
    pub const ALL: [Step; 7] = [
        Step::Reachability,
        Step::Session,
        Step::Version,
        Step::Update,
        Step::Screen,
        Step::Storage,
        Step::Cleanup,
    ];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Reachability => "reachability",
            Step::Session => "agent session",
            Step::Version => "agent version",
            Step::Update => "agent update",
            Step::Screen => "screen resolution",
            Step::Storage => "storage",
            Step::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// What happened to a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    Failed,
    /// Not needed, disabled, or never reached
    Skipped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Passed => write!(f, "passed"),
            StepStatus::Failed => write!(f, "failed"),
            StepStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct VerifyReport {
    device: DeviceId,
    steps: Vec<(Step, StepStatus)>,
    passed: bool,
}

impl VerifyReport {
    fn new(device: DeviceId) -> Self {
        Self {
            device,
            steps: Step::ALL.iter().map(|s| (*s, StepStatus::Skipped)).collect(),
            passed: false,
        }
    }

    /// Store a step result and hand it back
    fn record(&mut self, step: Step, ok: bool) -> bool {
        let status = if ok {
            StepStatus::Passed
        } else {
            StepStatus::Failed
        };
        if let Some(entry) = self.steps.iter_mut().find(|(s, _)| *s == step) {
            entry.1 = status;
        }
        ok
    }

    /// Device the report is about
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// Every step with its status, in execution order
    pub fn steps(&self) -> &[(Step, StepStatus)] {
        &self.steps
    }

    /// Status of one step
    pub fn status(&self, step: Step) -> StepStatus {
        self.steps
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, status)| *status)
            .unwrap_or(StepStatus::Skipped)
    }

    /// Whether the device is ready for a job
    pub fn passed(&self) -> bool {
        self.passed
    }
}

/// The collaborators a pipeline run delegates to
pub struct Collaborators {
    pub pinger: Box<dyn Pinger>,
    pub connector: Box<dyn SessionConnector>,
    pub updater: Box<dyn AgentUpdater>,
    pub cleanup: Box<dyn CleanupRoutine>,
}

impl Collaborators {
    /// Real collaborators talking to the SUT agent over the network
    pub fn standard(config: &VerifyConfig) -> Self {
        Self {
            pinger: Box::new(SystemPinger::new(config.ping_timeout)),
            connector: Box::new(SutConnector::from_config(config)),
            updater: Box::new(SutAgentUpdater::new(config.update.clone())),
            cleanup: Box::new(DeviceCleanup::new(config.cleanup.clone())),
        }
    }
}

/// Runs the verification pipeline against one device
pub struct Verifier {
    config: VerifyConfig,
    collaborators: Collaborators,
}

impl Verifier {
    pub fn new(config: VerifyConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    /// Verify the device in `ctx`
    pub async fn run(&self, ctx: &DeviceContext) -> VerifyReport {
        let mut report = VerifyReport::new(ctx.device().clone());
        let passed = self.execute(ctx, &mut report).await;
        report.passed = passed;

        if report.passed {
            tracing::info!("{} passed verification", ctx.device());
        } else {
            tracing::warn!("{} failed verification", ctx.device());
        }
        report
    }

    async fn execute(&self, ctx: &DeviceContext, report: &mut VerifyReport) -> bool {
        let c = &self.collaborators;
        let config = &self.config;

        let reachable = check_reachability(ctx, c.pinger.as_ref(), &config.retry).await;
        if !report.record(Step::Reachability, reachable) {
            return false;
        }

        let Some(handle) = establish_session(ctx, c.connector.as_ref(), &config.retry).await else {
            report.record(Step::Session, false);
            return false;
        };
        report.record(Step::Session, true);
        let mut session = ActiveSession::new(ctx, handle);

        let expected = c.updater.expected_version();
        let current = check_version(&mut session, &expected, false).await;
        if !report.record(Step::Version, current) {
            let updated = update_agent(&mut session, c.updater.as_ref()).await;
            if !report.record(Step::Update, updated) {
                return false;
            }
        }

        if config.screen.enabled {
            let screen_ok = check_screen(&mut session, &config.screen.expected).await;
            if !report.record(Step::Screen, screen_ok) {
                return false;
            }
        }

        let storage_ok = validate_storage(&mut session, &config.storage).await;
        if !report.record(Step::Storage, storage_ok) {
            return false;
        }

        let cleaned = run_cleanup(&mut session, c.cleanup.as_ref()).await;
        report.record(Step::Cleanup, cleaned)
    }
}
