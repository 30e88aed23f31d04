//! FleetFlow Cloud long-running operations
//!
//! Most control-plane mutations return a task id immediately and converge
//! later. This crate turns that into "do X and give me the final state":
//!
//! - [`Poller::wait_task`] polls a task until it succeeds, fails, times out
//!   or is cancelled
//! - [`Poller::resolve`] waits for a task and fetches the resource it touched
//! - [`Poller::wait_until_absent`] re-reads a parent resource until a deleted
//!   child disappears from its listing
//!
//! Providers plug in by implementing [`TaskSource`] (and [`ChildListing`] for
//! parents with child collections).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        provider client (create_*_and_wait)    │
//! └───────────────┬──────────────────────────────┘
//!                 │ TaskRef
//! ┌───────────────▼──────────────────────────────┐
//! │               fleetflow-cloud                 │
//! │  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │ Task Poller  │─▶│  Resource Resolver     │  │
//! │  └──────┬───────┘  └───────────────────────┘  │
//! │         │          ┌───────────────────────┐  │
//! │         │          │ Deletion Confirmation │  │
//! │         │          └───────────┬───────────┘  │
//! └─────────┼──────────────────────┼──────────────┘
//!           │ TaskSource           │ fetch parent
//! ┌─────────▼──────────────────────▼──────────────┐
//! │                 provider transport             │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fleetflow_cloud::{PollConfig, Poller};
//!
//! let poller = Poller::new(PollConfig::from_env()?);
//! let task = client.create_network(&request).await?;
//! let done = poller.wait_task(&client, task).await?;
//! ```

pub mod config;
pub mod deletion;
pub mod error;
pub mod poller;
pub mod resolver;
pub mod retry;
pub mod task;

// Re-exports
pub use config::{DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, PollConfig};
pub use deletion::ChildListing;
pub use error::{CloudError, Result};
pub use poller::Poller;
pub use resolver::require;
pub use retry::RetryConfig;
pub use task::{TaskId, TaskRef, TaskSource, TaskState, TaskStatus};
pub use tokio_util::sync::CancellationToken;
