//! Isolated networks

use crate::client::ServerspaceClient;
use crate::error::Result;
use crate::task::Task;
use fleetflow_cloud::{CloudError, TaskRef};
use serde::{Deserialize, Serialize};

const NETWORK_BASE_URL: &str = "networks/isolated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub location_id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub network_prefix: String,

    #[serde(default)]
    pub mask: u8,

    #[serde(default)]
    pub server_ids: Vec<String>,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub created: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateNetworkRequest {
    pub name: String,
    pub location_id: String,
    pub description: String,
    pub network_prefix: String,
    pub mask: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateNetworkRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct NetworkWrap {
    isolated_network: Network,
}

#[derive(Debug, Deserialize)]
struct NetworkListWrap {
    #[serde(default)]
    isolated_networks: Vec<Network>,
}

fn network_url(network_id: &str) -> String {
    format!("{}/{}", NETWORK_BASE_URL, network_id)
}

impl ServerspaceClient {
    pub async fn get_network(&self, network_id: &str) -> Result<Network> {
        let wrap: NetworkWrap = self.get(&network_url(network_id)).await?;
        Ok(wrap.isolated_network)
    }

    pub async fn list_networks(&self) -> Result<Vec<Network>> {
        let wrap: NetworkListWrap = self.get(NETWORK_BASE_URL).await?;
        Ok(wrap.isolated_networks)
    }

    pub async fn create_network(&self, request: &CreateNetworkRequest) -> Result<TaskRef> {
        self.post(NETWORK_BASE_URL, request).await
    }

    pub async fn create_network_and_wait(&self, request: &CreateNetworkRequest) -> Result<Network> {
        let task = self.create_network(request).await?;
        self.wait_network(task).await
    }

    pub async fn update_network(
        &self,
        network_id: &str,
        request: &UpdateNetworkRequest,
    ) -> Result<TaskRef> {
        self.put(&network_url(network_id), request).await
    }

    pub async fn update_network_and_wait(
        &self,
        network_id: &str,
        request: &UpdateNetworkRequest,
    ) -> Result<Network> {
        let task = self.update_network(network_id, request).await?;
        self.wait_network(task).await
    }

    pub async fn delete_network(&self, network_id: &str) -> Result<TaskRef> {
        self.delete(&network_url(network_id)).await
    }

    pub async fn delete_network_and_wait(&self, network_id: &str) -> Result<()> {
        let task = self.delete_network(network_id).await?;
        Ok(self.poller().wait_completed(self, task).await?)
    }

    /// Attach a tag to a network
    pub async fn tag_network(&self, network_id: &str, tag: &str) -> Result<()> {
        let url = format!("{}/tags", network_url(network_id));
        self.post_discard(&url, &TagRequest { value: tag }).await
    }

    /// Wait for a network task and fetch the network it touched
    pub async fn wait_network(&self, task: TaskRef) -> Result<Network> {
        let network = self
            .poller()
            .resolve(self, task, Task::network_id, |id| async move {
                self.get_network(&id).await.map_err(CloudError::from)
            })
            .await?;
        Ok(network)
    }
}
