//! # Retry
//!
//! A small retry combinator, independent of any particular request. An
//! operation is attempted up to a fixed number of times with a quadratic
//! backoff between attempts. All errors are retried alike.

use crate::constants::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How many times to attempt an operation and how long to wait in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// The delay after the given failed attempt (1-based): `base_delay * attempt²`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(attempt.saturating_mul(attempt))
    }

    /// The effective attempt cap. An operation always runs at least once.
    pub fn attempt_cap(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// The result of a retried operation together with the attempts it took.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Runs `op` until it succeeds or the policy's attempt cap is reached.
///
/// `op` receives the 1-based attempt number. After a failed attempt that is
/// not the last one, the task sleeps for `policy.backoff(attempt)`. The last
/// error is returned untouched once the cap is reached.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let cap = policy.attempt_cap();
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(e) if attempt >= cap => {
                return RetryOutcome {
                    result: Err(e),
                    attempts: attempt,
                }
            }
            Err(e) => {
                let delay = policy.backoff(attempt);
                debug!(attempt, cap, ?delay, "Attempt failed: {e}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
