//! Task status accessor

use crate::client::ServerspaceClient;
use crate::error::Result;
use async_trait::async_trait;
use fleetflow_cloud::{TaskId, TaskRef, TaskSource, TaskState, TaskStatus, require};
use serde::{Deserialize, Serialize};

const TASK_BASE_URL: &str = "tasks";

/// Task document as reported by the control plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,

    #[serde(
        default,
        rename = "kubernetes_cluster_id",
        alias = "k8s_cluster_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub kubernetes_cluster_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
}

impl TaskState for Task {
    fn task_id(&self) -> &TaskId {
        &self.id
    }

    fn status(&self) -> TaskStatus {
        self.status.clone()
    }
}

impl Task {
    pub fn domain_name(&self) -> fleetflow_cloud::Result<String> {
        require(self, self.domain_name.clone(), "domain name")
    }

    pub fn record(&self) -> fleetflow_cloud::Result<(String, u64)> {
        Ok((
            self.domain_name()?,
            require(self, self.record_id, "record id")?,
        ))
    }

    pub fn gateway_id(&self) -> fleetflow_cloud::Result<String> {
        require(self, self.gateway_id.clone(), "gateway id")
    }

    pub fn network_id(&self) -> fleetflow_cloud::Result<String> {
        require(self, self.network_id.clone(), "network id")
    }

    pub fn kubernetes_cluster_id(&self) -> fleetflow_cloud::Result<String> {
        require(
            self,
            self.kubernetes_cluster_id.clone(),
            "kubernetes cluster id",
        )
    }
}

#[derive(Debug, Deserialize)]
struct TaskWrap {
    task: Task,
}

impl ServerspaceClient {
    /// Current state of a task
    pub async fn get_task(&self, task_id: &TaskId) -> Result<Task> {
        let url = format!("{}/{}", TASK_BASE_URL, task_id);
        let wrap: TaskWrap = self.get(&url).await?;
        Ok(wrap.task)
    }

    /// Block until the task reaches a terminal state
    pub async fn wait_task(&self, task: TaskRef) -> Result<Task> {
        Ok(self.poller().wait_task(self, task).await?)
    }
}

#[async_trait]
impl TaskSource for ServerspaceClient {
    type Task = Task;

    async fn fetch_task(&self, task_id: &TaskId) -> fleetflow_cloud::Result<Task> {
        Ok(self.get_task(task_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetflow_cloud::CloudError;

    #[test]
    fn test_decode_task_document() {
        let task: Task = serde_json::from_str(
            r#"{"id":"lt42","status":"Completed","domain_name":"example.com","record_id":42}"#,
        )
        .unwrap();

        assert_eq!(task.status, TaskStatus::Succeeded);
        assert_eq!(
            task.record().unwrap(),
            ("example.com".to_string(), 42)
        );
    }

    #[test]
    fn test_missing_status_means_pending() {
        let task: Task = serde_json::from_str(r#"{"id":"lt1"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn test_k8s_alias() {
        let task: Task =
            serde_json::from_str(r#"{"id":"lt1","k8s_cluster_id":"k8s-1"}"#).unwrap();
        assert_eq!(task.kubernetes_cluster_id().unwrap(), "k8s-1");
    }

    #[test]
    fn test_missing_identifier() {
        let task: Task = serde_json::from_str(r#"{"id":"lt1","status":"done"}"#).unwrap();
        assert!(matches!(
            task.gateway_id(),
            Err(CloudError::MissingTaskField {
                field: "gateway id",
                ..
            })
        ));
    }
}
