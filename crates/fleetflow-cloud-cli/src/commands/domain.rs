use crate::output;
use fleetflow_cloud_serverspace::{CreateDomainRequest, ServerspaceClient};

pub async fn handle_list(client: &ServerspaceClient) -> anyhow::Result<()> {
    let domains = client.list_domains().await?;
    output::print_json(&domains)
}

pub async fn handle_get(client: &ServerspaceClient, name: &str) -> anyhow::Result<()> {
    let domain = client.get_domain(name).await?;
    output::print_json(&domain)
}

pub async fn handle_create(
    client: &ServerspaceClient,
    name: String,
    migrate_records: bool,
    wait: bool,
) -> anyhow::Result<()> {
    let request = CreateDomainRequest::new(name).with_migrate_records(migrate_records);
    let task = client.create_domain(&request).await?;
    if !wait {
        return output::print_accepted(&task);
    }

    output::waiting(&format!("ドメイン {} の作成", request.name));
    let domain = client.wait_domain(task).await?;
    output::done(&format!("ドメイン {} を作成しました", domain.name));
    output::print_json(&domain)
}

pub async fn handle_delete(client: &ServerspaceClient, name: &str, wait: bool) -> anyhow::Result<()> {
    if !wait {
        let task = client.delete_domain(name).await?;
        return output::print_accepted(&task);
    }

    output::waiting(&format!("ドメイン {} の削除", name));
    client.delete_domain_and_wait(name).await?;
    output::done(&format!("ドメイン {} を削除しました", name));
    Ok(())
}
