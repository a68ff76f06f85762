//! Retry policy for status polling.
//!
//! Pure arithmetic; the sleeping happens in `application::services::poll`.

use std::time::Duration;

use ec2ops_common::{BackoffKind, DispatcherConfig};

/// Bounded polling schedule: how many attempts, and the delay before each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Base delay; the first attempt always waits exactly this long.
    pub delay: Duration,
    pub backoff: BackoffKind,
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(5, Duration::from_secs(2))
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: BackoffKind::Fixed,
            max_delay: None,
        }
    }

    #[must_use]
    pub const fn with_backoff(mut self, backoff: BackoffKind) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub const fn with_max_delay(mut self, cap: Duration) -> Self {
        self.max_delay = Some(cap);
        self
    }

    #[must_use]
    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_millis(config.retry_delay_ms),
            backoff: config.backoff,
            max_delay: config.max_delay_ms.map(Duration::from_millis),
        }
    }

    /// Delay before the 1-based `attempt`. Saturates instead of overflowing.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let raw = match self.backoff {
            BackoffKind::Fixed => self.delay,
            BackoffKind::Linear => self.delay.saturating_mul(attempt),
            BackoffKind::Exponential => {
                let factor = 2u32.checked_pow(attempt - 1).unwrap_or(u32::MAX);
                self.delay.saturating_mul(factor)
            }
        };
        self.max_delay.map_or(raw, |cap| raw.min(cap))
    }

    /// Longest time a caller can be kept waiting by the sleeps alone.
    #[must_use]
    pub fn total_wait(&self) -> Duration {
        (1..=self.max_attempts).fold(Duration::ZERO, |acc, attempt| {
            acc.saturating_add(self.delay_for(attempt))
        })
    }
}
