//! Managed Kubernetes clusters and node groups
//!
//! Every mutation returns a task; the `_and_wait` forms resolve it to the
//! cluster snapshot.

use crate::client::ServerspaceClient;
use crate::error::Result;
use crate::task::Task;
use fleetflow_cloud::{CloudError, TaskRef};
use serde::{Deserialize, Serialize};

const KUBERNETES_BASE_URL: &str = "k8s_clusters";
const KUBERNETES_VERSIONS_URL: &str = "k8s_versions";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesCluster {
    pub id: String,

    #[serde(default)]
    pub location_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub high_availability: bool,

    #[serde(default)]
    pub node_groups: Vec<NodeGroup>,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroup {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub cpu_per_node: u32,

    /// Memory per node in MB
    #[serde(default)]
    pub ram_per_node: u32,

    #[serde(default)]
    pub number_of_nodes: u32,

    #[serde(default)]
    pub nodes: Vec<String>,

    #[serde(default)]
    pub ingress: bool,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Node group definition for create calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeGroupSpec {
    pub name: String,
    pub cpu_per_node: u32,
    pub ram_per_node: u32,
    pub number_of_nodes: u32,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ingress: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl NodeGroupSpec {
    pub fn new(name: impl Into<String>, cpu_per_node: u32, ram_per_node: u32, nodes: u32) -> Self {
        Self {
            name: name.into(),
            cpu_per_node,
            ram_per_node,
            number_of_nodes: nodes,
            ingress: false,
            tags: Vec::new(),
        }
    }

    pub fn with_ingress(mut self) -> Self {
        self.ingress = true;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateKubernetesClusterRequest {
    pub location_id: String,
    pub name: String,
    pub version: String,
    pub high_availability: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    pub node_groups: Vec<NodeGroupSpec>,
}

#[derive(Debug, Serialize)]
struct NodeGroupsRequest<'a> {
    node_groups: &'a [NodeGroupSpec],
}

#[derive(Debug, Serialize)]
struct ScaleRequest {
    number_of_nodes: u32,
}

#[derive(Debug, Serialize)]
struct UpgradeRequest<'a> {
    version: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClusterWrap {
    kubernetes_cluster: KubernetesCluster,
}

#[derive(Debug, Deserialize)]
struct ClusterListWrap {
    #[serde(default)]
    kubernetes_clusters: Vec<KubernetesCluster>,
}

#[derive(Debug, Deserialize)]
struct NodeGroupWrap {
    node_group: NodeGroup,
}

#[derive(Debug, Deserialize)]
struct NodeGroupListWrap {
    #[serde(default)]
    node_groups: Vec<NodeGroup>,
}

#[derive(Debug, Deserialize)]
struct VersionsWrap {
    #[serde(default)]
    versions: Vec<String>,
}

fn cluster_url(cluster_id: &str) -> String {
    format!("{}/{}", KUBERNETES_BASE_URL, cluster_id)
}

fn node_groups_url(cluster_id: &str) -> String {
    format!("{}/node_groups", cluster_url(cluster_id))
}

fn node_group_url(cluster_id: &str, node_group_id: &str) -> String {
    format!("{}/{}", node_groups_url(cluster_id), node_group_id)
}

impl ServerspaceClient {
    /// Kubernetes versions offered for new clusters
    pub async fn get_kubernetes_versions(&self) -> Result<Vec<String>> {
        let wrap: VersionsWrap = self.get(KUBERNETES_VERSIONS_URL).await?;
        Ok(wrap.versions)
    }

    /// Versions an existing cluster can be upgraded to
    pub async fn get_available_kubernetes_versions(&self, cluster_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/{}", cluster_url(cluster_id), KUBERNETES_VERSIONS_URL);
        let wrap: VersionsWrap = self.get(&url).await?;
        Ok(wrap.versions)
    }

    pub async fn get_kubernetes_cluster(&self, cluster_id: &str) -> Result<KubernetesCluster> {
        let wrap: ClusterWrap = self.get(&cluster_url(cluster_id)).await?;
        Ok(wrap.kubernetes_cluster)
    }

    pub async fn list_kubernetes_clusters(&self) -> Result<Vec<KubernetesCluster>> {
        let wrap: ClusterListWrap = self.get(KUBERNETES_BASE_URL).await?;
        Ok(wrap.kubernetes_clusters)
    }

    pub async fn list_kubernetes_node_groups(&self, cluster_id: &str) -> Result<Vec<NodeGroup>> {
        let wrap: NodeGroupListWrap = self.get(&node_groups_url(cluster_id)).await?;
        Ok(wrap.node_groups)
    }

    pub async fn get_kubernetes_node_group(
        &self,
        cluster_id: &str,
        node_group_id: &str,
    ) -> Result<NodeGroup> {
        let wrap: NodeGroupWrap = self.get(&node_group_url(cluster_id, node_group_id)).await?;
        Ok(wrap.node_group)
    }

    pub async fn create_kubernetes_cluster(
        &self,
        request: &CreateKubernetesClusterRequest,
    ) -> Result<TaskRef> {
        self.post(KUBERNETES_BASE_URL, request).await
    }

    pub async fn create_kubernetes_cluster_and_wait(
        &self,
        request: &CreateKubernetesClusterRequest,
    ) -> Result<KubernetesCluster> {
        let task = self.create_kubernetes_cluster(request).await?;
        self.wait_kubernetes_cluster(task).await
    }

    pub async fn create_kubernetes_node_groups(
        &self,
        cluster_id: &str,
        node_groups: &[NodeGroupSpec],
    ) -> Result<TaskRef> {
        self.post(&node_groups_url(cluster_id), &NodeGroupsRequest { node_groups })
            .await
    }

    pub async fn create_kubernetes_node_groups_and_wait(
        &self,
        cluster_id: &str,
        node_groups: &[NodeGroupSpec],
    ) -> Result<KubernetesCluster> {
        let task = self
            .create_kubernetes_node_groups(cluster_id, node_groups)
            .await?;
        self.wait_kubernetes_cluster(task).await
    }

    pub async fn scale_kubernetes_node_group(
        &self,
        cluster_id: &str,
        node_group_id: &str,
        number_of_nodes: u32,
    ) -> Result<TaskRef> {
        self.put(
            &node_group_url(cluster_id, node_group_id),
            &ScaleRequest { number_of_nodes },
        )
        .await
    }

    pub async fn scale_kubernetes_node_group_and_wait(
        &self,
        cluster_id: &str,
        node_group_id: &str,
        number_of_nodes: u32,
    ) -> Result<KubernetesCluster> {
        let task = self
            .scale_kubernetes_node_group(cluster_id, node_group_id, number_of_nodes)
            .await?;
        self.wait_kubernetes_cluster(task).await
    }

    pub async fn deploy_ingress_controller(
        &self,
        cluster_id: &str,
        node_group_id: &str,
    ) -> Result<TaskRef> {
        let url = format!("{}/ingress", node_group_url(cluster_id, node_group_id));
        self.post_empty(&url).await
    }

    pub async fn deploy_ingress_controller_and_wait(
        &self,
        cluster_id: &str,
        node_group_id: &str,
    ) -> Result<KubernetesCluster> {
        let task = self
            .deploy_ingress_controller(cluster_id, node_group_id)
            .await?;
        self.wait_kubernetes_cluster(task).await
    }

    pub async fn upgrade_kubernetes_cluster(&self, cluster_id: &str, version: &str) -> Result<TaskRef> {
        self.put(&cluster_url(cluster_id), &UpgradeRequest { version })
            .await
    }

    pub async fn upgrade_kubernetes_cluster_and_wait(
        &self,
        cluster_id: &str,
        version: &str,
    ) -> Result<KubernetesCluster> {
        let task = self.upgrade_kubernetes_cluster(cluster_id, version).await?;
        self.wait_kubernetes_cluster(task).await
    }

    pub async fn delete_kubernetes_cluster(&self, cluster_id: &str) -> Result<TaskRef> {
        self.delete(&cluster_url(cluster_id)).await
    }

    pub async fn delete_kubernetes_cluster_and_wait(&self, cluster_id: &str) -> Result<()> {
        let task = self.delete_kubernetes_cluster(cluster_id).await?;
        Ok(self.poller().wait_completed(self, task).await?)
    }

    pub async fn delete_kubernetes_node_group(
        &self,
        cluster_id: &str,
        node_group_id: &str,
    ) -> Result<TaskRef> {
        self.delete(&node_group_url(cluster_id, node_group_id)).await
    }

    /// Wait for a cluster task and fetch the cluster it touched
    pub async fn wait_kubernetes_cluster(&self, task: TaskRef) -> Result<KubernetesCluster> {
        let cluster = self
            .poller()
            .resolve(self, task, Task::kubernetes_cluster_id, |id| async move {
                self.get_kubernetes_cluster(&id).await.map_err(CloudError::from)
            })
            .await?;
        Ok(cluster)
    }
}
