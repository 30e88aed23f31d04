//! Serverspace provider for FleetFlow
//!
//! Client for the Serverspace control-plane API. Mutating calls return a
//! [`TaskRef`]; the `*_and_wait` forms drive the task to completion with the
//! `fleetflow-cloud` poller and return the final resource snapshot.
//!
//! # Features
//!
//! - DNS domains and records (record deletion confirmed against the zone)
//! - Isolated networks
//! - Gateways with firewall and NAT rules
//! - Managed Kubernetes clusters and node groups
//! - OS image catalogue
//!
//! # Requirements
//!
//! - `SERVERSPACE_API_KEY` env var (the key prefix selects the regional API)
//! - Optional: `SERVERSPACE_HOST`, `SERVERSPACE_USER_AGENT`,
//!   `FLEETFLOW_CLOUD_POLL_INTERVAL_SECS`, `FLEETFLOW_CLOUD_MAX_WAIT_SECS`
//!
//! # Example
//!
//! ```ignore
//! use fleetflow_cloud_serverspace::{DomainRecord, ServerspaceClient};
//!
//! let client = ServerspaceClient::from_env()?;
//!
//! // Create a record and wait until it is live
//! let record = client
//!     .create_record_and_wait("example.com", &DomainRecord::a("www", "203.0.113.1"))
//!     .await?;
//!
//! // Delete it and wait until the zone no longer lists it
//! client.delete_record_and_wait("example.com", record.id).await?;
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod host;
pub mod image;
pub mod kubernetes;
pub mod network;
pub mod task;
pub mod transport;

pub use client::ServerspaceClient;
pub use config::ClientConfig;
pub use domain::{
    CreateDomainRequest, Domain, DomainRecord, DomainRecordResponse, ProtocolType, RecordType,
};
pub use error::{Result, ServerspaceError};
pub use gateway::{
    CreateGatewayRequest, FirewallAction, FirewallDirection, FirewallRule, Gateway, GatewayNic,
    NatRule, NatRuleType, RuleProtocol,
};
pub use host::{REGION_HOSTS, resolve_host};
pub use image::Image;
pub use kubernetes::{CreateKubernetesClusterRequest, KubernetesCluster, NodeGroup, NodeGroupSpec};
pub use network::{CreateNetworkRequest, Network, UpdateNetworkRequest};
pub use task::Task;
pub use transport::{ApiRequest, HttpTransport, Method, Transport};

pub use fleetflow_cloud::{CancellationToken, CloudError, PollConfig, RetryConfig, TaskId, TaskRef};
