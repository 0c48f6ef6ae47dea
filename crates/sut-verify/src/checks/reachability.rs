//! Network reachability check

use sut_core::retry::{retry, RetryPolicy};
use sut_core::traits::Pinger;
use sut_core::Failure;

use crate::context::DeviceContext;

/// Ping the device until it answers or the policy gives up
pub async fn check_reachability(
    ctx: &DeviceContext,
    pinger: &dyn Pinger,
    policy: &RetryPolicy,
) -> bool {
    tracing::info!("Attempting to ping {}", ctx.device());

    match retry("ping device", policy, |_| pinger.ping(ctx.device())).await {
        Ok(()) => {
            tracing::info!("{} is reachable", ctx.device());
            true
        }
        Err(exhausted) => {
            ctx.raise(Failure::Unreachable {
                attempts: exhausted.attempts,
            });
            false
        }
    }
}
