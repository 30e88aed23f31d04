use crate::output;
use fleetflow_cloud::TaskRef;
use fleetflow_cloud_serverspace::ServerspaceClient;

pub async fn handle_wait(client: &ServerspaceClient, id: String) -> anyhow::Result<()> {
    output::waiting(&format!("タスク {}", id));
    let task = client.wait_task(TaskRef::new(id)).await?;
    output::done(&format!("タスク {} が完了しました", task.id));
    output::print_json(&task)
}
