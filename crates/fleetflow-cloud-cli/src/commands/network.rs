use crate::output;
use fleetflow_cloud_serverspace::{CreateNetworkRequest, ServerspaceClient};

pub async fn handle_list(client: &ServerspaceClient) -> anyhow::Result<()> {
    output::print_json(&client.list_networks().await?)
}

pub async fn handle_get(client: &ServerspaceClient, id: &str) -> anyhow::Result<()> {
    output::print_json(&client.get_network(id).await?)
}

pub async fn handle_create(
    client: &ServerspaceClient,
    request: CreateNetworkRequest,
    wait: bool,
) -> anyhow::Result<()> {
    let task = client.create_network(&request).await?;
    if !wait {
        return output::print_accepted(&task);
    }

    output::waiting(&format!("ネットワーク {} の作成", request.name));
    let network = client.wait_network(task).await?;
    output::done(&format!("ネットワーク {} ({}) を作成しました", network.name, network.id));
    output::print_json(&network)
}

pub async fn handle_delete(client: &ServerspaceClient, id: &str, wait: bool) -> anyhow::Result<()> {
    if !wait {
        let task = client.delete_network(id).await?;
        return output::print_accepted(&task);
    }

    output::waiting(&format!("ネットワーク {} の削除", id));
    client.delete_network_and_wait(id).await?;
    output::done(&format!("ネットワーク {} を削除しました", id));
    Ok(())
}
