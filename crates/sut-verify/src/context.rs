//! Per-invocation verification state
//!
//! Nothing about the device under test is global. The orchestrator builds a
//! [`DeviceContext`] at startup and, once a session is up, wraps it together
//! with the session handle in an [`ActiveSession`] that is passed by `&mut`
//! to every later step.

use sut_core::traits::{DeviceSession, FlagWriter};
use sut_core::{DeviceId, Failure};

/// The device being verified and where its failures are recorded
pub struct DeviceContext {
    device: DeviceId,
    flag: Box<dyn FlagWriter>,
}

impl DeviceContext {
    /// Create a context for one device
    pub fn new(device: DeviceId, flag: Box<dyn FlagWriter>) -> Self {
        Self { device, flag }
    }

    /// Device under test
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// Record a step failure
    ///
    /// Flagged failures overwrite the device's diagnostic flag with the
    /// failure's message.
    pub fn raise(&self, failure: Failure) {
        tracing::warn!(device = %self.device, "{}", failure);
        if failure.is_flagged() {
            self.flag.set_flag(&failure.to_string());
        }
    }
}

/// An established session to the device under test
pub struct ActiveSession<'a> {
    ctx: &'a DeviceContext,
    handle: Box<dyn DeviceSession>,
    dead: bool,
}

impl<'a> ActiveSession<'a> {
    /// Wrap a freshly established session
    pub fn new(ctx: &'a DeviceContext, handle: Box<dyn DeviceSession>) -> Self {
        Self {
            ctx,
            handle,
            dead: false,
        }
    }

    /// Context of the device this session belongs to
    pub fn ctx(&self) -> &'a DeviceContext {
        self.ctx
    }

    /// The underlying session handle
    pub fn handle(&mut self) -> &mut dyn DeviceSession {
        self.handle.as_mut()
    }

    /// Whether the liveness guard has already given up on this session
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub(crate) fn mark_dead(&mut self) {
        self.dead = true;
    }
}
