//! Deletion confirmation for child resources
//!
//! A delete task can report success before the parent's listing drops the
//! child. These waits re-read the parent until the child is gone.

use crate::error::Result;
use crate::poller::Poller;
use std::fmt;
use std::future::Future;
use tracing::{debug, trace};

/// A resource snapshot that embeds a collection of children
pub trait ChildListing: fmt::Debug {
    type ChildId: fmt::Display + ?Sized;

    fn contains_child(&self, id: &Self::ChildId) -> bool;
}

impl Poller {
    /// Re-fetch the parent on the poll interval until `child_id` is absent.
    ///
    /// Returns the first snapshot that no longer lists the child. Fetch errors
    /// end the wait immediately; the deadline is checked after every
    /// non-confirming fetch.
    pub async fn wait_until_absent<P, F, Fut>(
        &self,
        child_id: &P::ChildId,
        mut fetch_parent: F,
    ) -> Result<P>
    where
        P: ChildListing,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<P>>,
    {
        let mut session = self.session(format!("deletion of {}", child_id))?;
        loop {
            let attempt = session.next_attempt().await?;
            let parent = session.guard(fetch_parent()).await?;

            if !parent.contains_child(child_id) {
                debug!(child = %child_id, attempts = attempt, "Deletion confirmed");
                return Ok(parent);
            }

            trace!(child = %child_id, attempt, parent = ?parent, "Child still listed");
            session.ensure_within_deadline()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudError;
    use crate::poller::tests::poller;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Clone)]
    struct Zone {
        records: Vec<u64>,
    }

    impl ChildListing for Zone {
        type ChildId = u64;

        fn contains_child(&self, id: &u64) -> bool {
            self.records.iter().any(|r| r == id)
        }
    }

    struct Listings {
        snapshots: Mutex<VecDeque<Zone>>,
        calls: AtomicUsize,
    }

    impl Listings {
        fn new(snapshots: Vec<Vec<u64>>) -> Self {
            Self {
                snapshots: Mutex::new(
                    snapshots
                        .into_iter()
                        .map(|records| Zone { records })
                        .collect(),
                ),
                calls: AtomicUsize::new(0),
            }
        }

        async fn fetch(&self) -> Result<Zone> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut snapshots = self.snapshots.lock().unwrap();
            let zone = if snapshots.len() > 1 {
                snapshots.pop_front().unwrap()
            } else {
                snapshots.front().cloned().unwrap()
            };
            Ok(zone)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirms_on_first_fetch_without_child() {
        let listings = Listings::new(vec![vec![1, 7], vec![7, 1], vec![1]]);

        let zone = assert_ok!(poller(5, 60).wait_until_absent(&7, || listings.fetch()).await);

        assert_eq!(zone.records, vec![1]);
        assert_eq!(listings.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_while_child_listed() {
        let listings = Listings::new(vec![vec![7]]);

        let err = assert_err!(poller(5, 20).wait_until_absent(&7, || listings.fetch()).await);

        match err {
            CloudError::Timeout { elapsed, .. } => assert!(elapsed >= Duration::from_secs(20)),
            other => panic!("expected Timeout, got {other:?}"),
        }
        assert_eq!(listings.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_ends_wait() {
        let calls = AtomicUsize::new(0);

        let err = assert_err!(
            poller(5, 60)
                .wait_until_absent(&7, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async {
                        Err::<Zone, _>(CloudError::transport(std::io::Error::other("boom")))
                    }
                })
                .await
        );

        assert!(matches!(err, CloudError::Transport(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
