//! Verification steps
//!
//! Every step reports a plain pass/fail. A step that fails records its
//! reason through [`DeviceContext::raise`](crate::context::DeviceContext::raise)
//! before returning; callers never see why a step failed, only that it did.

mod cleanup;
mod liveness;
mod reachability;
mod screen;
mod session;
mod storage;
mod update;
mod version;

pub use cleanup::run_cleanup;
pub use liveness::ensure_alive;
pub use reachability::check_reachability;
pub use screen::check_screen;
pub use session::establish_session;
pub use storage::validate_storage;
pub use update::update_agent;
pub use version::check_version;
