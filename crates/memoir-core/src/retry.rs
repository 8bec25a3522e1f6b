//! Bounded retry with exponential backoff and jitter.
//!
//! Used by the infrastructure layer around outbound HTTP calls (embedding
//! and classification providers). Jitter spreads retries from concurrent
//! nightly workers so they do not hammer the provider in lockstep.

use rand::Rng;

use std::time::Duration;

/// Retry behavior for outbound provider calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Base delay, doubled on each subsequent attempt.
    pub base_delay_ms: u64,
    /// Cap on the computed delay before jitter.
    pub max_delay_ms: u64,
    /// Add 0-50% random jitter on top of the capped delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed. `attempt` is 1-based.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay before retrying after a failed `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt.saturating_sub(1).min(20));
        let capped = self
            .base_delay_ms
            .saturating_mul(multiplier)
            .min(self.max_delay_ms);

        let final_ms = if self.jitter {
            let factor = 1.0 + rand::thread_rng().gen_range(0.0..0.5);
            (capped as f64 * factor) as u64
        } else {
            capped
        };

        Duration::from_millis(final_ms)
    }
}
