//! sut-core: Core abstractions for device pre-flight verification
//!
//! This crate provides the shared types, error taxonomy, configuration
//! constants, retry policy and collaborator traits used by the
//! verification pipeline and its concrete device transport.

pub mod config;
pub mod error;
pub mod flag;
pub mod retry;
pub mod traits;
pub mod types;

pub use error::{DeviceError, Failure};
pub use retry::RetryPolicy;
pub use types::{CleanupCode, DeviceId, ScreenMode, UpdateOutcome};
