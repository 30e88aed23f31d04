//! Retry policy for transient request failures
//!
//! Only transports use this. The pollers never retry across error kinds.

use std::time::Duration;

/// Retry configuration for provider requests
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Cap on any single delay
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Never retry
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Delay to sleep after the given 0-based failed attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        let delay = (self.initial_delay.as_secs_f64() * factor).min(self.max_delay.as_secs_f64());
        // NaN and negative products (bad multiplier) fall back to no delay
        Duration::try_from_secs_f64(delay).unwrap_or(Duration::ZERO)
    }

    /// Whether another attempt is allowed after `attempt` attempts were made
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
