//! Display resolution check

use sut_core::error::ScreenFailure;
use sut_core::traits::DeviceSession;
use sut_core::{DeviceError, ScreenMode};

use super::ensure_alive;
use crate::context::{ActiveSession, DeviceContext};

/// Check the display resolution, and try to repair it if it is wrong
///
/// A repair needs a reboot, so a wrong resolution always fails the run even
/// when the device accepted the new mode.
pub async fn check_screen(session: &mut ActiveSession<'_>, expected: &ScreenMode) -> bool {
    if !ensure_alive(session).await {
        return false;
    }

    let ctx = session.ctx();
    match check_and_fix(ctx, session.handle(), expected).await {
        Ok(correct) => correct,
        Err(e) => {
            ctx.raise(ScreenFailure::Transport(e).into());
            false
        }
    }
}

async fn check_and_fix(
    ctx: &DeviceContext,
    handle: &mut dyn DeviceSession,
    expected: &ScreenMode,
) -> Result<bool, DeviceError> {
    let found = handle.screen_info().await?;
    let wanted = expected.agent_format();

    if found == wanted {
        tracing::info!("Got expected screen size '{}'", wanted);
        return Ok(true);
    }

    ctx.raise(
        ScreenFailure::Mismatch {
            found,
            expected: wanted,
        }
        .into(),
    );

    if !handle.adjust_resolution(expected).await? {
        ctx.raise(ScreenFailure::AdjustFailed.into());
        return Ok(false);
    }

    tracing::info!("Resolution adjusted, rebooting {}", ctx.device());
    // The agent usually drops the connection as it goes down
    if let Err(e) = handle.reboot().await {
        tracing::debug!("Reboot request ended with: {}", e);
    }
    Ok(false)
}
