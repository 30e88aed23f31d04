//! Serverspace API client

use crate::config::ClientConfig;
use crate::error::{Result, ServerspaceError};
use crate::transport::{ApiRequest, HttpTransport, Method, Transport};
use fleetflow_cloud::{CancellationToken, PollConfig, Poller};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Serverspace control-plane client
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct ServerspaceClient {
    transport: Arc<dyn Transport>,
    poller: Poller,
}

impl ServerspaceClient {
    /// Create a client over HTTP.
    ///
    /// Fails with [`ServerspaceError::WrongKeyFormat`] when no host is set and
    /// the key prefix does not name a known region.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.poll.validate()?;
        let transport = HttpTransport::new(&config)?;
        tracing::debug!("Serverspace client for {}", transport.base_url());

        Ok(Self {
            transport: Arc::new(transport),
            poller: Poller::new(config.poll),
        })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>, poll: PollConfig) -> Self {
        Self {
            transport,
            poller: Poller::new(poll),
        }
    }

    /// Waits started from the returned client abort when `cancel` fires
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            poller: self.poller.clone().with_cancellation(cancel),
        }
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    async fn send(&self, request: ApiRequest) -> Result<Option<serde_json::Value>> {
        self.transport.execute(request).await
    }

    async fn send_decoded<T>(&self, request: ApiRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = request.path.clone();
        let value = self
            .send(request)
            .await?
            .ok_or(ServerspaceError::EmptyResponse(path))?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_decoded(ApiRequest::new(Method::Get, path)).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Post, path).with_body(serde_json::to_value(body)?);
        self.send_decoded(request).await
    }

    pub(crate) async fn post_empty<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_decoded(ApiRequest::new(Method::Post, path)).await
    }

    /// POST whose response body is ignored
    pub(crate) async fn post_discard<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::Post, path).with_body(serde_json::to_value(body)?);
        self.send(request).await.map(|_| ())
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Put, path).with_body(serde_json::to_value(body)?);
        self.send_decoded(request).await
    }

    /// PUT whose response body is ignored
    pub(crate) async fn put_discard<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::Put, path).with_body(serde_json::to_value(body)?);
        self.send(request).await.map(|_| ())
    }

    pub(crate) async fn delete<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_decoded(ApiRequest::new(Method::Delete, path)).await
    }
}

impl std::fmt::Debug for ServerspaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerspaceClient")
            .field("poll", self.poller.config())
            .finish_non_exhaustive()
    }
}
