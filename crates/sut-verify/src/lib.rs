//! sut-verify: Pre-flight verification for remote test devices
//!
//! Before a test job is dispatched to a device, the pipeline checks that the
//! device answers pings, accepts an agent session, runs the expected agent
//! version (updating it if not), can write to its removable storage, and
//! comes back clean from the cleanup routine. The first unrecoverable
//! failure aborts the run and leaves a diagnostic flag for the device.

pub mod checks;
pub mod context;
pub mod device_cleanup;
pub mod output;
pub mod ping;
pub mod pipeline;
pub mod transport;
pub mod updater;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{ActiveSession, DeviceContext};
pub use pipeline::{Collaborators, Step, StepStatus, Verifier, VerifyReport};
