//! Cleanup routine invocation

use sut_core::traits::CleanupRoutine;
use sut_core::{CleanupCode, Failure};

use super::ensure_alive;
use crate::context::ActiveSession;

/// Hand the session to the cleanup routine
///
/// Only an explicit success code passes. The routine keeps its own
/// diagnostics, so a failure here is logged but not flagged.
pub async fn run_cleanup(session: &mut ActiveSession<'_>, routine: &dyn CleanupRoutine) -> bool {
    if !ensure_alive(session).await {
        return false;
    }

    match routine.run(session.handle()).await {
        Ok(CleanupCode::Success) => {
            tracing::info!("Cleanup finished");
            true
        }
        Ok(CleanupCode::Failed) => {
            session
                .ctx()
                .raise(Failure::CleanupFailed("routine reported failure".into()));
            false
        }
        Err(e) => {
            session.ctx().raise(Failure::CleanupFailed(e.to_string()));
            false
        }
    }
}
