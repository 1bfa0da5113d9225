//! Retry backoff for the subscriber's read loop.
//!
//! The delay sequence is driven by a [`RetryPolicy`]: `Immediate` never
//! waits, `Exponential` doubles from `initial` until it reaches `max` and
//! stays there until [`RetryBackoff::reset`] is called after a success.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::config::RetryPolicy;
use crate::core::shutdown::ShutdownListener;

// 2^31 already exceeds any sane cap; keeps the shift in range.
const MAX_DOUBLINGS: u32 = 31;

#[derive(Debug)]
pub struct RetryBackoff {
    policy: RetryPolicy,
    failures: u32,
}

impl RetryBackoff {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    /// Delay to apply after the current failure, or `None` to retry at once.
    pub fn next_delay(&mut self) -> Option<Duration> {
        match self.policy {
            RetryPolicy::Immediate => None,
            RetryPolicy::Exponential { initial, max } => {
                let factor = 1u32 << self.failures.min(MAX_DOUBLINGS);
                let delay = initial.saturating_mul(factor).min(max);
                if delay < max {
                    self.failures += 1;
                }
                Some(delay)
            }
        }
    }

    /// Forget previous failures.
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Sleeps for the next delay, if the policy asks for one.
    ///
    /// Returns `false` when `shutdown` fired before the delay ran out.
    pub async fn snooze(&mut self, shutdown: &mut ShutdownListener) -> bool {
        let Some(delay) = self.next_delay() else {
            return true;
        };
        debug!(?delay, "backing off before next attempt");
        tokio::select! {
            biased;
            _ = shutdown.recv() => false,
            _ = sleep(delay) => true,
        }
    }
}
