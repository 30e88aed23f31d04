use crate::output;
use crate::{RecordKind, SrvArgs, SrvProtocol};
use anyhow::Context;
use fleetflow_cloud_serverspace::{DomainRecord, ProtocolType, RecordType, ServerspaceClient};

/// `--value` をレコードタイプに応じたフィールドへ割り当てる
pub fn build_record(
    kind: RecordKind,
    name: String,
    value: String,
    ttl: Option<String>,
    priority: Option<u32>,
    srv: SrvArgs,
) -> anyhow::Result<DomainRecord> {
    let mut record = match kind {
        RecordKind::A => DomainRecord::a(name, value),
        RecordKind::Aaaa => DomainRecord::aaaa(name, value),
        RecordKind::Cname => DomainRecord::cname(name, value),
        RecordKind::Txt => DomainRecord::txt(name, value),
        RecordKind::Mx => DomainRecord::mx(name, value, priority.unwrap_or(10)),
        RecordKind::Ns => DomainRecord {
            name_server_host: Some(value),
            ..DomainRecord::new(name, RecordType::Ns)
        },
        RecordKind::Srv => {
            let protocol = match srv.protocol.context("SRV レコードには --protocol が必要です")? {
                SrvProtocol::Tcp => ProtocolType::Tcp,
                SrvProtocol::Udp => ProtocolType::Udp,
                SrvProtocol::Tls => ProtocolType::Tls,
            };
            DomainRecord {
                target: Some(value),
                priority: Some(priority.unwrap_or(0)),
                service: Some(srv.service.context("SRV レコードには --service が必要です")?),
                protocol: Some(protocol),
                port: Some(srv.port.context("SRV レコードには --port が必要です")?),
                weight: Some(srv.weight.unwrap_or(0)),
                ..DomainRecord::new(name, RecordType::Srv)
            }
        }
    };
    record.ttl = ttl;
    Ok(record)
}

pub async fn handle_list(client: &ServerspaceClient, domain: &str) -> anyhow::Result<()> {
    output::print_json(&client.list_records(domain).await?)
}

pub async fn handle_create(
    client: &ServerspaceClient,
    domain: &str,
    record: DomainRecord,
    wait: bool,
) -> anyhow::Result<()> {
    let task = client.create_record(domain, &record).await?;
    if !wait {
        return output::print_accepted(&task);
    }

    output::waiting(&format!("{} レコード {}.{} の作成", record.record_type, record.name, domain));
    let created = client.wait_domain_record(task).await?;
    output::done(&format!("レコード {} を作成しました", created.id));
    output::print_json(&created)
}

pub async fn handle_delete(
    client: &ServerspaceClient,
    domain: &str,
    id: u64,
    wait: bool,
) -> anyhow::Result<()> {
    if !wait {
        let task = client.delete_record(domain, id).await?;
        return output::print_accepted(&task);
    }

    output::waiting(&format!("レコード {} の削除", id));
    let remaining = client.delete_record_and_wait(domain, id).await?;
    output::done(&format!(
        "レコード {} を削除しました（残り {} 件）",
        id,
        remaining.records.len()
    ));
    Ok(())
}
