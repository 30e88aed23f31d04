//! Resource resolution on top of the task poller

use crate::error::{CloudError, Result};
use crate::poller::Poller;
use crate::task::{TaskRef, TaskSource, TaskState};
use std::future::Future;
use tracing::debug;

impl Poller {
    /// Wait for `task`, then fetch the resource it touched.
    ///
    /// `extract` reads the resource identifier from the succeeded task and
    /// `fetch` is called exactly once with it. Poller errors are returned
    /// unchanged and no fetch happens.
    pub async fn resolve<S, I, T, X, F, Fut>(
        &self,
        source: &S,
        task: TaskRef,
        extract: X,
        fetch: F,
    ) -> Result<T>
    where
        S: TaskSource + ?Sized,
        X: FnOnce(&S::Task) -> Result<I>,
        F: FnOnce(I) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let completed = self.wait_task(source, task).await?;
        let id = extract(&completed)?;

        if self.cancellation().is_cancelled() {
            return Err(CloudError::Cancelled {
                operation: format!("resolve task {}", completed.task_id()),
            });
        }

        debug!(task_id = %completed.task_id(), "Fetching resource for completed task");
        fetch(id).await
    }
}

/// Read a required identifier from a succeeded task
pub fn require<T, V>(task: &T, value: Option<V>, field: &'static str) -> Result<V>
where
    T: TaskState + ?Sized,
{
    value.ok_or_else(|| CloudError::MissingTaskField {
        task_id: task.task_id().clone(),
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::tests::{FakeTask, ScriptedTasks, poller};
    use crate::task::TaskStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test(start_paused = true)]
    async fn test_fetches_once_after_success() {
        let source = ScriptedTasks::new(&[
            TaskStatus::Pending,
            TaskStatus::Pending,
            TaskStatus::Succeeded,
        ]);
        let fetches = AtomicUsize::new(0);

        let record = assert_ok!(
            poller(5, 60)
                .resolve(
                    &source,
                    TaskRef::new("t1"),
                    |task: &FakeTask| require(task, task.record_id, "record id"),
                    |id| {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        async move { Ok(format!("record-{id}")) }
                    },
                )
                .await
        );

        assert_eq!(record, "record-42");
        assert_eq!(source.calls(), 3);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_error_skips_fetch() {
        let source = ScriptedTasks::new(&[TaskStatus::Failed]);
        let fetches = AtomicUsize::new(0);

        let err = assert_err!(
            poller(5, 60)
                .resolve(
                    &source,
                    TaskRef::new("t1"),
                    |task: &FakeTask| require(task, task.record_id, "record id"),
                    |_id| {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        async { Ok(()) }
                    },
                )
                .await
        );

        assert!(err.is_task_failure());
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_identifier_is_an_error() {
        let source = ScriptedTasks::new(&[TaskStatus::Succeeded]);

        let err = assert_err!(
            poller(5, 60)
                .resolve(
                    &source,
                    TaskRef::new("t1"),
                    |task: &FakeTask| require(task, None::<String>, "gateway id"),
                    |_id: String| async { Ok(()) },
                )
                .await
        );

        match err {
            CloudError::MissingTaskField { task_id, field } => {
                assert_eq!(task_id.as_str(), "t1");
                assert_eq!(field, "gateway id");
            }
            other => panic!("expected MissingTaskField, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_completed_discards_document() {
        let source = ScriptedTasks::new(&[TaskStatus::Running, TaskStatus::Succeeded]);

        assert_ok!(poller(5, 60).wait_completed(&source, TaskRef::new("t1")).await);
        assert_eq!(source.calls(), 2);
    }
}
