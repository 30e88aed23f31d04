//! Cloud operation error types

use std::time::Duration;
use thiserror::Error;

use crate::task::{TaskId, TaskStatus};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while driving a long-running operation to completion
#[derive(Error, Debug)]
pub enum CloudError {
    /// The underlying request failed (network, decode, non-2xx)
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The control plane reported the task as terminally failed
    #[error("Task {task_id} failed with status {status}")]
    TaskFailed { task_id: TaskId, status: TaskStatus },

    #[error("Timeout: {operation} did not finish within {max_wait:?} (elapsed {elapsed:?})")]
    Timeout {
        operation: String,
        elapsed: Duration,
        max_wait: Duration,
    },

    #[error("Cancelled: {operation}")]
    Cancelled { operation: String },

    /// A succeeded task did not carry the identifier needed to fetch its resource
    #[error("Task {task_id} completed without a {field}")]
    MissingTaskField { task_id: TaskId, field: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CloudError {
    /// Wrap a collaborator error as a transport failure
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CloudError::Transport(Box::new(err))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CloudError::Timeout { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CloudError::Cancelled { .. })
    }

    pub fn is_task_failure(&self) -> bool {
        matches!(self, CloudError::TaskFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
