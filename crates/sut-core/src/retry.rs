//! Bounded retry with a fixed backoff between attempts

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::config::{MAX_RETRIES, RETRY_DELAY};

/// How often and how patiently an operation is retried
///
/// Attempt 1 is preceded by `initial_delay`; every later attempt is
/// preceded by `delay`. Nothing is slept after the final attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first (minimum 1)
    pub max_attempts: u32,
    /// Wait before the first attempt
    pub initial_delay: Duration,
    /// Wait before each subsequent attempt
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            initial_delay: Duration::ZERO,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with no wait before the first attempt
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            delay,
        }
    }

    /// Set the wait before the first attempt
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Wait that precedes the given attempt (1-based)
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            self.initial_delay
        } else {
            self.delay
        }
    }

    /// Effective number of attempts
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Every attempt failed
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// Number of attempts made
    pub attempts: u32,
    /// Error from the final attempt
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

/// Run `op` until it succeeds or the policy's attempts are used up
///
/// `op` receives the 1-based attempt number. The loop cannot be cancelled;
/// it runs to success or exhaustion.
pub async fn retry<F, Fut, T, E>(
    label: &str,
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            tracing::info!("Waiting {:?} before {} attempt {}", delay, label, attempt);
            tokio::time::sleep(delay).await;
        }

        match op(attempt).await {
            Ok(value) => {
                tracing::debug!(label, attempt, "attempt succeeded");
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::warn!("Unable to {} after {} tries: {}", label, attempt, e);
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                tracing::info!("Unable to {} after {} tries: {}", label, attempt, e);
                attempt += 1;
            }
        }
    }
}
