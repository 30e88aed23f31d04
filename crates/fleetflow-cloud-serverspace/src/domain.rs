//! DNS domains and records
//!
//! Record deletion is confirmed by re-reading the domain until the record
//! drops out of its listing, since the delete task can finish before the
//! zone converges.

use crate::client::ServerspaceClient;
use crate::error::Result;
use crate::task::Task;
use fleetflow_cloud::{ChildListing, CloudError, TaskRef};
use serde::{Deserialize, Serialize};
use std::fmt;

const DOMAIN_BASE_URL: &str = "domains";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Mx,
    Cname,
    Ns,
    Txt,
    Srv,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Mx => "MX",
            RecordType::Cname => "CNAME",
            RecordType::Ns => "NS",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
        };
        f.write_str(s)
    }
}

/// Transport protocol of an SRV record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProtocolType {
    Tcp,
    Udp,
    Tls,
}

/// Record body as sent on create and update
///
/// Which optional fields apply depends on `record_type`: `ip` for A/AAAA,
/// `mail_host`/`priority` for MX, `canonical_name` for CNAME and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_server_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ProtocolType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

impl DomainRecord {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
            ip: None,
            mail_host: None,
            priority: None,
            canonical_name: None,
            name_server_host: None,
            text: None,
            protocol: None,
            service: None,
            weight: None,
            port: None,
            target: None,
            ttl: None,
        }
    }

    pub fn a(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            ..Self::new(name, RecordType::A)
        }
    }

    pub fn aaaa(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            ..Self::new(name, RecordType::Aaaa)
        }
    }

    pub fn cname(name: impl Into<String>, canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: Some(canonical_name.into()),
            ..Self::new(name, RecordType::Cname)
        }
    }

    pub fn mx(name: impl Into<String>, mail_host: impl Into<String>, priority: u32) -> Self {
        Self {
            mail_host: Some(mail_host.into()),
            priority: Some(priority),
            ..Self::new(name, RecordType::Mx)
        }
    }

    pub fn txt(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(name, RecordType::Txt)
        }
    }

    pub fn with_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }
}

/// Record as stored in a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecordResponse {
    pub id: u64,

    #[serde(flatten)]
    pub record: DomainRecord,
}

/// Domain snapshot, including its records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub is_delegated: bool,

    #[serde(default)]
    pub records: Vec<DomainRecordResponse>,
}

impl ChildListing for Domain {
    type ChildId = u64;

    fn contains_child(&self, id: &u64) -> bool {
        self.records.iter().any(|r| r.id == *id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDomainRequest {
    pub name: String,
    pub migrate_records: bool,
}

impl CreateDomainRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            migrate_records: false,
        }
    }

    pub fn with_migrate_records(mut self, migrate: bool) -> Self {
        self.migrate_records = migrate;
        self
    }
}

#[derive(Debug, Deserialize)]
struct DomainWrap {
    domain: Domain,
}

#[derive(Debug, Deserialize)]
struct DomainListWrap {
    #[serde(default)]
    domains: Vec<Domain>,
}

#[derive(Debug, Deserialize)]
struct RecordWrap {
    record: DomainRecordResponse,
}

#[derive(Debug, Deserialize)]
struct RecordListWrap {
    #[serde(default)]
    records: Vec<DomainRecordResponse>,
}

fn domain_url(domain_name: &str) -> String {
    format!("{}/{}", DOMAIN_BASE_URL, domain_name)
}

fn records_url(domain_name: &str) -> String {
    format!("{}/records", domain_url(domain_name))
}

fn record_url(domain_name: &str, record_id: u64) -> String {
    format!("{}/{}", records_url(domain_name), record_id)
}

impl ServerspaceClient {
    pub async fn get_domain(&self, domain_name: &str) -> Result<Domain> {
        let wrap: DomainWrap = self.get(&domain_url(domain_name)).await?;
        Ok(wrap.domain)
    }

    pub async fn list_domains(&self) -> Result<Vec<Domain>> {
        let wrap: DomainListWrap = self.get(DOMAIN_BASE_URL).await?;
        Ok(wrap.domains)
    }

    pub async fn create_domain(&self, request: &CreateDomainRequest) -> Result<TaskRef> {
        self.post(DOMAIN_BASE_URL, request).await
    }

    pub async fn create_domain_and_wait(&self, request: &CreateDomainRequest) -> Result<Domain> {
        let task = self.create_domain(request).await?;
        self.wait_domain(task).await
    }

    pub async fn delete_domain(&self, domain_name: &str) -> Result<TaskRef> {
        self.delete(&domain_url(domain_name)).await
    }

    pub async fn delete_domain_and_wait(&self, domain_name: &str) -> Result<()> {
        let task = self.delete_domain(domain_name).await?;
        Ok(self.poller().wait_completed(self, task).await?)
    }

    pub async fn get_record(&self, domain_name: &str, record_id: u64) -> Result<DomainRecordResponse> {
        let wrap: RecordWrap = self.get(&record_url(domain_name, record_id)).await?;
        Ok(wrap.record)
    }

    pub async fn list_records(&self, domain_name: &str) -> Result<Vec<DomainRecordResponse>> {
        let wrap: RecordListWrap = self.get(&records_url(domain_name)).await?;
        Ok(wrap.records)
    }

    pub async fn create_record(&self, domain_name: &str, record: &DomainRecord) -> Result<TaskRef> {
        self.post(&records_url(domain_name), record).await
    }

    pub async fn create_record_and_wait(
        &self,
        domain_name: &str,
        record: &DomainRecord,
    ) -> Result<DomainRecordResponse> {
        let task = self.create_record(domain_name, record).await?;
        self.wait_domain_record(task).await
    }

    pub async fn update_record(
        &self,
        domain_name: &str,
        record_id: u64,
        record: &DomainRecord,
    ) -> Result<TaskRef> {
        self.put(&record_url(domain_name, record_id), record).await
    }

    pub async fn update_record_and_wait(
        &self,
        domain_name: &str,
        record_id: u64,
        record: &DomainRecord,
    ) -> Result<DomainRecordResponse> {
        let task = self.update_record(domain_name, record_id, record).await?;
        self.wait_domain_record(task).await
    }

    pub async fn delete_record(&self, domain_name: &str, record_id: u64) -> Result<TaskRef> {
        self.delete(&record_url(domain_name, record_id)).await
    }

    /// Delete a record and wait until the domain no longer lists it.
    ///
    /// The delete task must succeed first; the listing can lag behind it.
    /// Returns the first domain snapshot without the record.
    pub async fn delete_record_and_wait(&self, domain_name: &str, record_id: u64) -> Result<Domain> {
        let task = self.delete_record(domain_name, record_id).await?;
        self.poller().wait_completed(self, task).await?;
        self.wait_record_deletion(domain_name, record_id).await
    }

    /// Re-read the domain until `record_id` is gone from its records
    pub async fn wait_record_deletion(&self, domain_name: &str, record_id: u64) -> Result<Domain> {
        let domain = self
            .poller()
            .wait_until_absent(&record_id, move || async move {
                self.get_domain(domain_name).await.map_err(CloudError::from)
            })
            .await?;
        Ok(domain)
    }

    /// Wait for a domain task and fetch the domain it touched
    pub async fn wait_domain(&self, task: TaskRef) -> Result<Domain> {
        let domain = self
            .poller()
            .resolve(self, task, Task::domain_name, |name| async move {
                self.get_domain(&name).await.map_err(CloudError::from)
            })
            .await?;
        Ok(domain)
    }

    /// Wait for a record task and fetch the record it touched
    pub async fn wait_domain_record(&self, task: TaskRef) -> Result<DomainRecordResponse> {
        let record = self
            .poller()
            .resolve(self, task, Task::record, |(name, id)| async move {
                self.get_record(&name, id).await.map_err(CloudError::from)
            })
            .await?;
        Ok(record)
    }
}
