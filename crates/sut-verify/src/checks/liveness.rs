//! Session liveness guard

use sut_core::Failure;

use crate::context::ActiveSession;

/// Confirm the session still answers before using it
///
/// Any failure of the clock call counts as a dead session. Once dead, the
/// session stays dead: later calls return false without touching the device
/// or writing another flag.
pub async fn ensure_alive(session: &mut ActiveSession<'_>) -> bool {
    if session.is_dead() {
        tracing::debug!("Session already marked dead");
        return false;
    }

    match session.handle().current_time().await {
        Ok(clock) if !clock.trim().is_empty() => return true,
        Ok(_) => tracing::debug!("Liveness check returned an empty clock"),
        Err(e) => tracing::debug!("Liveness check failed: {}", e),
    }

    session.mark_dead();
    session.ctx().raise(Failure::LivenessLost);
    false
}
