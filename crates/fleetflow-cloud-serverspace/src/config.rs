//! Client configuration

use crate::error::{Result, ServerspaceError};
use crate::host::resolve_host;
use fleetflow_cloud::{PollConfig, RetryConfig};
use std::time::Duration;

const USER_AGENT_PREFIX: &str = "goss";
const API_PATH: &str = "api/v1/";

/// Configuration for [`ServerspaceClient`](crate::ServerspaceClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,

    /// Explicit API host; derived from the key prefix when unset
    pub host: Option<String>,

    /// Appended to the `goss` user agent as `goss/<agent>`
    pub user_agent: Option<String>,

    pub poll: PollConfig,

    /// Retries for transient failures of idempotent requests
    pub retry: RetryConfig,

    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: None,
            user_agent: None,
            poll: PollConfig::default(),
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Create ClientConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SERVERSPACE_API_KEY")
            .map_err(|_| ServerspaceError::MissingEnvVar("SERVERSPACE_API_KEY".to_string()))?;

        let mut config = Self::new(api_key);
        config.host = std::env::var("SERVERSPACE_HOST").ok().filter(|h| !h.is_empty());
        config.user_agent = std::env::var("SERVERSPACE_USER_AGENT")
            .ok()
            .filter(|a| !a.is_empty());
        config.poll = PollConfig::from_env()?;
        Ok(config)
    }

    /// API host, either explicit or routed by key prefix
    pub fn resolved_host(&self) -> Result<String> {
        match &self.host {
            Some(host) if !host.is_empty() => Ok(host.trim_end_matches('/').to_string()),
            _ => resolve_host(&self.api_key).map(str::to_string),
        }
    }

    pub fn base_url(&self) -> Result<String> {
        Ok(format!("{}/{}", self.resolved_host()?, API_PATH))
    }

    pub fn user_agent_header(&self) -> String {
        match &self.user_agent {
            Some(agent) => format!("{}/{}", USER_AGENT_PREFIX, agent),
            None => USER_AGENT_PREFIX.to_string(),
        }
    }
}
