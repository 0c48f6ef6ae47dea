//! Agent session establishment

use sut_core::retry::{retry, RetryPolicy};
use sut_core::traits::{DeviceSession, SessionConnector};
use sut_core::Failure;

use crate::context::DeviceContext;

/// Open a session to the device, retrying with backoff
///
/// Returns `None` once the policy is exhausted.
pub async fn establish_session(
    ctx: &DeviceContext,
    connector: &dyn SessionConnector,
    policy: &RetryPolicy,
) -> Option<Box<dyn DeviceSession>> {
    tracing::info!("Connecting to agent on {}", ctx.device());

    match retry("connect to device", policy, |_| connector.connect(ctx.device())).await {
        Ok(session) => {
            tracing::info!("Connected to agent on {}", ctx.device());
            Some(session)
        }
        Err(exhausted) => {
            ctx.raise(Failure::SessionUnavailable {
                attempts: exhausted.attempts,
            });
            None
        }
    }
}
