//! Polling configuration

use crate::error::{CloudError, Result};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(20 * 60);

const ENV_POLL_INTERVAL: &str = "FLEETFLOW_CLOUD_POLL_INTERVAL_SECS";
const ENV_MAX_WAIT: &str = "FLEETFLOW_CLOUD_MAX_WAIT_SECS";

/// Schedule shared by the task and deletion pollers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay between two attempts
    pub interval: Duration,

    /// Upper bound on a single wait, measured from the start of the wait
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Build from the defaults, overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(secs) = read_secs(ENV_POLL_INTERVAL)? {
            config.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = read_secs(ENV_MAX_WAIT)? {
            config.max_wait = Duration::from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(CloudError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.max_wait < self.interval {
            return Err(CloudError::InvalidConfig(format!(
                "max wait {:?} is shorter than the poll interval {:?}",
                self.max_wait, self.interval
            )));
        }
        Ok(())
    }
}

fn read_secs(var: &str) -> Result<Option<u64>> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| CloudError::InvalidConfig(format!("{} must be whole seconds: {}", var, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.max_wait, Duration::from_secs(1200));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = PollConfig::default().with_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(CloudError::InvalidConfig(_))));
    }

    #[test]
    fn test_max_wait_shorter_than_interval_rejected() {
        let config = PollConfig::new(Duration::from_secs(10), Duration::from_secs(5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [(ENV_POLL_INTERVAL, Some("2")), (ENV_MAX_WAIT, Some("60"))],
            || {
                let config = PollConfig::from_env().unwrap();
                assert_eq!(config.interval, Duration::from_secs(2));
                assert_eq!(config.max_wait, Duration::from_secs(60));
            },
        );
    }

    #[test]
    fn test_from_env_defaults_when_unset() {
        temp_env::with_vars_unset([ENV_POLL_INTERVAL, ENV_MAX_WAIT], || {
            assert_eq!(PollConfig::from_env().unwrap(), PollConfig::default());
        });
    }

    #[test]
    fn test_from_env_rejects_garbage() {
        temp_env::with_var(ENV_POLL_INTERVAL, Some("soon"), || {
            assert!(matches!(
                PollConfig::from_env(),
                Err(CloudError::InvalidConfig(_))
            ));
        });
    }
}
