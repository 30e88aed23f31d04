//! HTTP transport
//!
//! The client talks to the API only through [`Transport`], which sends one
//! request and hands back the decoded JSON document. [`HttpTransport`] is the
//! reqwest implementation used in production.

use crate::config::ClientConfig;
use crate::error::{Result, ServerspaceError};
use async_trait::async_trait;
use fleetflow_cloud::RetryConfig;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    pub fn is_idempotent_read(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One API call: method, path relative to the API root, optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Send a request, return the decoded response document (`None` if empty)
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<Option<serde_json::Value>>;
}

/// reqwest-backed transport with API key authentication
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl HttpTransport {
    /// Build the transport. Fails fast on a key without a known region prefix
    /// when no explicit host is configured.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ServerspaceError::WrongKeyFormat)?;
        headers.insert(API_KEY_HEADER, api_key);
        let agent = HeaderValue::from_str(&config.user_agent_header())
            .map_err(|_| ServerspaceError::InvalidConfig("invalid user agent".to_string()))?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            retry: config.retry.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<Option<serde_json::Value>> {
        let url = format!("{}{}", self.base_url, request.path.trim_start_matches('/'));
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.into(), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ServerspaceError::Api {
                status: status.as_u16(),
                message: error_message(&bytes, status.canonical_reason()),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Option<serde_json::Value>> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.send_once(&request).await {
                Ok(body) => return Ok(body),
                Err(e)
                    if request.method.is_idempotent_read()
                        && e.is_transient()
                        && self.retry.should_retry(attempt) =>
                {
                    let delay = self.retry.delay_for_attempt(attempt - 1);
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorDocument {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Best-effort message from an error response body
fn error_message(body: &[u8], reason: Option<&str>) -> String {
    if let Ok(doc) = serde_json::from_slice::<ErrorDocument>(body) {
        if let Some(entry) = doc.errors.first() {
            return entry.message.clone();
        }
        if let Some(message) = doc.message {
            return message;
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        reason.unwrap_or("Unknown error").to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_errors_array() {
        let body = br#"{"errors":[{"code":"not_found","message":"Domain not found"}]}"#;
        assert_eq!(error_message(body, Some("Not Found")), "Domain not found");
    }

    #[test]
    fn test_error_message_from_message_field() {
        let body = br#"{"message":"Invalid API key"}"#;
        assert_eq!(error_message(body, None), "Invalid API key");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(b"gateway exploded", None), "gateway exploded");
        assert_eq!(error_message(b"", Some("Bad Gateway")), "Bad Gateway");
        assert_eq!(error_message(b"  ", None), "Unknown error");
    }

    #[test]
    fn test_transport_rejects_unknown_region() {
        let config = ClientConfig::new("zz-not-a-key");
        assert!(matches!(
            HttpTransport::new(&config),
            Err(ServerspaceError::WrongKeyFormat)
        ));
    }

    #[test]
    fn test_only_get_is_retried() {
        assert!(Method::Get.is_idempotent_read());
        assert!(!Method::Post.is_idempotent_read());
        assert!(!Method::Delete.is_idempotent_read());
    }
}
