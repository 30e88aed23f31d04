//! Task completion poller
//!
//! Turns a [`TaskRef`] into the resolved task document by re-reading the
//! task on a fixed interval until it reaches a terminal state, the wait
//! deadline passes, or the caller cancels.

use crate::config::PollConfig;
use crate::error::{CloudError, Result};
use crate::task::{TaskRef, TaskSource, TaskState, TaskStatus};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Entry point for every wait operation.
///
/// Holds only configuration and the cancellation signal; each call opens its
/// own polling session, so one `Poller` can serve concurrent waits.
#[derive(Debug, Clone, Default)]
pub struct Poller {
    config: PollConfig,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Abandon waits when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Poll a task until it succeeds, fails, times out or is cancelled
    pub async fn wait_task<S>(&self, source: &S, task: TaskRef) -> Result<S::Task>
    where
        S: TaskSource + ?Sized,
    {
        let task_id = task.into_id();
        if task_id.is_empty() {
            return Err(CloudError::InvalidInput(
                "task id must not be empty".to_string(),
            ));
        }

        let mut session = self.session(format!("task {}", task_id))?;
        loop {
            let attempt = session.next_attempt().await?;
            let current = session.guard(source.fetch_task(&task_id)).await?;

            match current.status() {
                TaskStatus::Succeeded => {
                    info!(
                        task_id = %task_id,
                        attempts = attempt,
                        elapsed_ms = session.elapsed().as_millis() as u64,
                        "Task completed"
                    );
                    return Ok(current);
                }
                TaskStatus::Failed => {
                    return Err(CloudError::TaskFailed {
                        task_id,
                        status: TaskStatus::Failed,
                    });
                }
                status => {
                    debug!(task_id = %task_id, attempt, status = %status, "Task still in progress");
                    session.ensure_within_deadline()?;
                }
            }
        }
    }

    /// Wait for a task and discard its document
    pub async fn wait_completed<S>(&self, source: &S, task: TaskRef) -> Result<()>
    where
        S: TaskSource + ?Sized,
    {
        self.wait_task(source, task).await.map(|_| ())
    }

    pub(crate) fn session(&self, operation: String) -> Result<PollSession<'_>> {
        self.config.validate()?;
        Ok(PollSession::start(operation, &self.config, &self.cancel))
    }
}

/// State of one wait call: its timer, deadline clock and attempt counter.
///
/// The timer lives and dies with the session, so every exit path releases it.
pub(crate) struct PollSession<'a> {
    operation: String,
    ticker: Interval,
    started: Instant,
    max_wait: Duration,
    cancel: &'a CancellationToken,
    attempts: u32,
}

impl<'a> PollSession<'a> {
    fn start(operation: String, config: &PollConfig, cancel: &'a CancellationToken) -> Self {
        let started = Instant::now();
        let mut ticker = tokio::time::interval_at(started + config.interval, config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            operation,
            ticker,
            started,
            max_wait: config.max_wait,
            cancel,
            attempts: 0,
        }
    }

    /// Sleep until the next attempt is due and return its 1-based number
    pub(crate) async fn next_attempt(&mut self) -> Result<u32> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(self.cancelled()),
            _ = self.ticker.tick() => {
                self.attempts += 1;
                Ok(self.attempts)
            }
        }
    }

    /// Run one fetch, abandoning it if the wait is cancelled meanwhile
    pub(crate) async fn guard<T, F>(&self, fetch: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(self.cancelled()),
            result = fetch => result,
        }
    }

    pub(crate) fn ensure_within_deadline(&self) -> Result<()> {
        let elapsed = self.elapsed();
        if elapsed >= self.max_wait {
            return Err(CloudError::Timeout {
                operation: self.operation.clone(),
                elapsed,
                max_wait: self.max_wait,
            });
        }
        Ok(())
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn cancelled(&self) -> CloudError {
        CloudError::Cancelled {
            operation: self.operation.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::task::TaskId;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct FakeTask {
        pub id: TaskId,
        pub status: TaskStatus,
        pub record_id: Option<u64>,
    }

    impl TaskState for FakeTask {
        fn task_id(&self) -> &TaskId {
            &self.id
        }

        fn status(&self) -> TaskStatus {
            self.status.clone()
        }
    }

    /// Replays a scripted status sequence; the last entry repeats forever
    pub(crate) struct ScriptedTasks {
        script: Mutex<VecDeque<Result<FakeTask>>>,
        last: Mutex<Option<FakeTask>>,
        pub calls: AtomicUsize,
    }

    impl ScriptedTasks {
        pub fn new(statuses: &[TaskStatus]) -> Self {
            let script = statuses
                .iter()
                .map(|status| {
                    Ok(FakeTask {
                        id: TaskId::from("t1"),
                        status: status.clone(),
                        record_id: status.is_success().then_some(42),
                    })
                })
                .collect();
            Self::from_results(script)
        }

        pub fn from_results(script: VecDeque<Result<FakeTask>>) -> Self {
            Self {
                script: Mutex::new(script),
                last: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskSource for ScriptedTasks {
        type Task = FakeTask;

        async fn fetch_task(&self, _task_id: &TaskId) -> Result<FakeTask> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok(task)) => {
                    *self.last.lock().unwrap() = Some(task.clone());
                    Ok(task)
                }
                Some(Err(e)) => Err(e),
                None => Ok(self
                    .last
                    .lock()
                    .unwrap()
                    .clone()
                    .expect("script must not be empty")),
            }
        }
    }

    pub(crate) fn poller(interval: u64, max_wait: u64) -> Poller {
        Poller::new(PollConfig::new(
            Duration::from_secs(interval),
            Duration::from_secs(max_wait),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_n_attempts() {
        let source = ScriptedTasks::new(&[
            TaskStatus::Pending,
            TaskStatus::Running,
            TaskStatus::Succeeded,
        ]);
        let started = Instant::now();

        let task = assert_ok!(poller(5, 60).wait_task(&source, TaskRef::new("t1")).await);

        assert_eq!(task.status, TaskStatus::Succeeded);
        assert_eq!(task.record_id, Some(42));
        assert_eq!(source.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_waits_one_interval() {
        let source = ScriptedTasks::new(&[TaskStatus::Succeeded]);
        let started = Instant::now();

        assert_ok!(poller(5, 60).wait_task(&source, TaskRef::new("t1")).await);

        assert_eq!(source.calls(), 1);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_stops_immediately() {
        let source = ScriptedTasks::new(&[TaskStatus::Failed, TaskStatus::Succeeded]);

        let err = assert_err!(poller(5, 60).wait_task(&source, TaskRef::new("t1")).await);

        match err {
            CloudError::TaskFailed { task_id, status } => {
                assert_eq!(task_id.as_str(), "t1");
                assert_eq!(status, TaskStatus::Failed);
            }
            other => panic!("expected TaskFailed, got {other:?}"),
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_max_wait() {
        let source = ScriptedTasks::new(&[TaskStatus::Pending]);

        let err = assert_err!(poller(5, 20).wait_task(&source, TaskRef::new("t1")).await);

        match err {
            CloudError::Timeout {
                elapsed, max_wait, ..
            } => {
                assert!(elapsed >= Duration::from_secs(20));
                assert_eq!(max_wait, Duration::from_secs(20));
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_not_retried() {
        let mut script = VecDeque::new();
        script.push_back(Ok(FakeTask {
            id: TaskId::from("t1"),
            status: TaskStatus::Running,
            record_id: None,
        }));
        script.push_back(Err(CloudError::transport(std::io::Error::other(
            "connection reset",
        ))));
        let source = ScriptedTasks::from_results(script);

        let err = assert_err!(poller(5, 60).wait_task(&source, TaskRef::new("t1")).await);

        assert!(matches!(err, CloudError::Transport(_)));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_keeps_polling() {
        let source = ScriptedTasks::new(&[
            TaskStatus::Unknown("Suspended".into()),
            TaskStatus::Succeeded,
        ]);

        assert_ok!(poller(5, 60).wait_task(&source, TaskRef::new("t1")).await);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_sleep() {
        let source = ScriptedTasks::new(&[TaskStatus::Pending]);
        let token = CancellationToken::new();
        let poller = poller(5, 600).with_cancellation(token.clone());
        let started = Instant::now();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            token.cancel();
        });

        let err = assert_err!(poller.wait_task(&source, TaskRef::new("t1")).await);
        canceller.await.unwrap();

        assert!(err.is_cancelled());
        assert_eq!(source.calls(), 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_task_id_rejected() {
        let source = ScriptedTasks::new(&[TaskStatus::Succeeded]);

        let err = assert_err!(poller(5, 60).wait_task(&source, TaskRef::new("")).await);

        assert!(matches!(err, CloudError::InvalidInput(_)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_rejected_before_polling() {
        let source = ScriptedTasks::new(&[TaskStatus::Succeeded]);
        let poller = Poller::new(PollConfig::new(Duration::ZERO, Duration::from_secs(10)));

        let err = assert_err!(poller.wait_task(&source, TaskRef::new("t1")).await);

        assert!(matches!(err, CloudError::InvalidConfig(_)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waits_are_independent() {
        let fast = ScriptedTasks::new(&[TaskStatus::Succeeded]);
        let slow = ScriptedTasks::new(&[
            TaskStatus::Pending,
            TaskStatus::Pending,
            TaskStatus::Pending,
            TaskStatus::Succeeded,
        ]);
        let poller = poller(5, 60);

        let (a, b) = tokio::join!(
            poller.wait_task(&fast, TaskRef::new("t1")),
            poller.wait_task(&slow, TaskRef::new("t2")),
        );

        assert_ok!(a);
        assert_ok!(b);
        assert_eq!(fast.calls(), 1);
        assert_eq!(slow.calls(), 4);
    }
}
