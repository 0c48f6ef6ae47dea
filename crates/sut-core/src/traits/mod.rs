//! Core trait definitions
//!
//! The verification pipeline only talks to these traits. Concrete
//! implementations live in `sut-verify`; tests substitute fakes.

mod collaborators;
mod device;

pub use collaborators::{AgentUpdater, CleanupRoutine, FlagWriter, Pinger};
pub use device::{DeviceSession, SessionConnector};
