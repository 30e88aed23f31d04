//! Task model shared by every control-plane provider
//!
//! A mutating call hands back a [`TaskRef`]; the provider exposes the
//! task document through a [`TaskSource`] and the [`Poller`](crate::Poller)
//! drives it to a terminal [`TaskStatus`].

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque task identifier issued by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Reference returned by an asynchronous mutating call.
///
/// Not `Clone`: a reference is moved into exactly one wait.
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct TaskRef {
    #[serde(rename = "task_id", alias = "id")]
    pub id: TaskId,
}

impl TaskRef {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }

    pub fn into_id(self) -> TaskId {
        self.id
    }
}

/// Task lifecycle as reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    /// Vocabulary this client does not know yet; treated as still in flight
    Unknown(String),
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Succeeded)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "created" | "queued" => TaskStatus::Pending,
            "running" | "in_progress" | "inprogress" => TaskStatus::Running,
            "succeeded" | "completed" | "success" | "done" => TaskStatus::Succeeded,
            "failed" | "error" | "canceled" | "cancelled" => TaskStatus::Failed,
            _ => TaskStatus::Unknown(raw.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        TaskStatus::from(raw.as_str())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the poller needs to know about a fetched task document
pub trait TaskState: fmt::Debug + Send {
    fn task_id(&self) -> &TaskId;

    fn status(&self) -> TaskStatus;
}

/// Task-status accessor implemented by each provider client
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Provider-specific resolved task document
    type Task: TaskState;

    /// Fetch the current state of a task
    async fn fetch_task(&self, task_id: &TaskId) -> Result<Self::Task>;
}
