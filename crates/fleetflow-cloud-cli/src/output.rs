use colored::Colorize;
use fleetflow_cloud::TaskRef;
use serde::Serialize;

/// 結果をJSONでstdoutに出力
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 受け付けたタスクを表示（待機しない場合）
pub fn print_accepted(task: &TaskRef) -> anyhow::Result<()> {
    eprintln!(
        "{} タスク {} を受け付けました",
        "→".blue(),
        task.id.as_str().cyan()
    );
    print_json(&serde_json::json!({ "task_id": task.id }))
}

pub fn waiting(what: &str) {
    eprintln!("{} {}", "⏳".yellow(), format!("{}の完了を待機中...", what).dimmed());
}

pub fn done(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message.green());
}
