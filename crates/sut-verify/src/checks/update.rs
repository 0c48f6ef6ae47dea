//! Agent update and outcome handling

use sut_core::error::UpdateFailure;
use sut_core::traits::AgentUpdater;
use sut_core::{Failure, UpdateOutcome};

use super::{check_version, ensure_alive};
use crate::context::ActiveSession;

/// Bring the agent up to the expected version
///
/// Returns true only when the updater reports success.
pub async fn update_agent(session: &mut ActiveSession<'_>, updater: &dyn AgentUpdater) -> bool {
    if !ensure_alive(session).await {
        return false;
    }

    let expected = updater.expected_version();
    tracing::info!("Updating agent to '{}'", expected);

    match updater.update(session.handle()).await {
        UpdateOutcome::Success => {
            tracing::info!("Agent updated to '{}'", expected);
            true
        }
        UpdateOutcome::DownloadFailed => {
            session.ctx().raise(UpdateFailure::DownloadFailed.into());
            false
        }
        UpdateOutcome::ReverifyFailed => {
            session.ctx().raise(UpdateFailure::ReverifyFailed.into());
            false
        }
        UpdateOutcome::ReverifyWrong => {
            session.ctx().raise(UpdateFailure::ReverifyWrong.into());
            // Put the version the device actually reports into the flag
            if check_version(session, &expected, true).await {
                // The updater saw a wrong version, a direct check sees the
                // right one. Points at a bug in the updater itself.
                session.ctx().raise(Failure::ContradictoryUpdateState);
            }
            false
        }
    }
}
