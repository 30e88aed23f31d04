mod commands;
mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use fleetflow_cloud::{CancellationToken, PollConfig};
use fleetflow_cloud_serverspace::{ClientConfig, ServerspaceClient};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "fleet-cloud")]
#[command(about = "Serverspace のリソースを操作し、タスクの完了を待つ", long_about = None)]
#[command(version)]
struct Cli {
    /// APIキー（先頭2文字でリージョンを判定）
    #[arg(long, env = "SERVERSPACE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// APIホスト（省略時はキーから判定）
    #[arg(long, env = "SERVERSPACE_HOST")]
    host: Option<String>,

    /// User-Agent に付加するエージェント名
    #[arg(long, env = "SERVERSPACE_USER_AGENT")]
    user_agent: Option<String>,

    /// ポーリング間隔（秒）
    #[arg(long, env = "FLEETFLOW_CLOUD_POLL_INTERVAL_SECS", default_value_t = 5)]
    poll_interval: u64,

    /// 最大待機時間（秒）
    #[arg(long, env = "FLEETFLOW_CLOUD_MAX_WAIT_SECS", default_value_t = 1200)]
    max_wait: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// タスクを操作
    #[command(subcommand)]
    Task(TaskCommands),
    /// DNSドメインを管理
    #[command(subcommand)]
    Domain(DomainCommands),
    /// DNSレコードを管理
    #[command(subcommand)]
    Record(RecordCommands),
    /// 分離ネットワークを管理
    #[command(subcommand)]
    Network(NetworkCommands),
    /// ゲートウェイを参照
    #[command(subcommand)]
    Gateway(GatewayCommands),
    /// Kubernetesクラスタを参照
    #[command(subcommand)]
    K8s(K8sCommands),
    /// OSイメージを参照
    #[command(subcommand)]
    Image(ImageCommands),
}

#[derive(Subcommand)]
enum TaskCommands {
    /// タスクが完了するまで待機
    Wait {
        /// タスクID
        id: String,
    },
}

#[derive(Subcommand)]
enum DomainCommands {
    /// ドメイン一覧
    List,
    /// ドメインの詳細
    Get { name: String },
    /// ドメインを作成
    Create {
        name: String,
        /// 既存のレコードを移行する
        #[arg(long)]
        migrate_records: bool,
        /// 完了まで待機
        #[arg(short, long)]
        wait: bool,
    },
    /// ドメインを削除
    Delete {
        name: String,
        /// 完了まで待機
        #[arg(short, long)]
        wait: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    A,
    Aaaa,
    Mx,
    Cname,
    Ns,
    Txt,
    Srv,
}

#[derive(Clone, Copy, ValueEnum)]
enum SrvProtocol {
    Tcp,
    Udp,
    Tls,
}

/// SRV レコード専用の項目
#[derive(Args, Default)]
struct SrvArgs {
    /// サービス名（例: _sip）
    #[arg(long)]
    service: Option<String>,
    /// プロトコル
    #[arg(long, value_enum)]
    protocol: Option<SrvProtocol>,
    /// ポート番号
    #[arg(long)]
    port: Option<u16>,
    /// 重み
    #[arg(long)]
    weight: Option<u32>,
}

#[derive(Subcommand)]
enum RecordCommands {
    /// レコード一覧
    List { domain: String },
    /// レコードを作成
    Create {
        domain: String,
        /// レコード名（例: www, @）
        #[arg(long)]
        name: String,
        /// レコードタイプ
        #[arg(long = "type", value_enum)]
        kind: RecordKind,
        /// 値（IP、ホスト名、テキストなど）
        #[arg(long)]
        value: String,
        /// TTL（例: 1h）
        #[arg(long)]
        ttl: Option<String>,
        /// MX / SRV の優先度
        #[arg(long)]
        priority: Option<u32>,
        #[command(flatten)]
        srv: SrvArgs,
        /// 完了まで待機
        #[arg(short, long)]
        wait: bool,
    },
    /// レコードを削除
    Delete {
        domain: String,
        id: u64,
        /// ドメインから消えるまで待機
        #[arg(short, long)]
        wait: bool,
    },
}

#[derive(Subcommand)]
enum NetworkCommands {
    /// ネットワーク一覧
    List,
    /// ネットワークの詳細
    Get { id: String },
    /// ネットワークを作成
    Create {
        #[arg(long)]
        name: String,
        /// ロケーションID（例: am2）
        #[arg(long)]
        location: String,
        /// ネットワークアドレス（例: 192.168.0.0）
        #[arg(long)]
        prefix: String,
        /// プレフィックス長
        #[arg(long, default_value_t = 24)]
        mask: u8,
        #[arg(long, default_value = "")]
        description: String,
        /// 完了まで待機
        #[arg(short, long)]
        wait: bool,
    },
    /// ネットワークを削除
    Delete {
        id: String,
        /// 完了まで待機
        #[arg(short, long)]
        wait: bool,
    },
}

#[derive(Subcommand)]
enum GatewayCommands {
    /// ゲートウェイ一覧
    List,
    /// ゲートウェイの詳細
    Get { id: String },
}

#[derive(Subcommand)]
enum K8sCommands {
    /// クラスタ一覧
    List,
    /// クラスタの詳細
    Get { id: String },
    /// 利用可能なKubernetesバージョン
    Versions {
        /// 指定したクラスタのアップグレード先を表示
        #[arg(long)]
        cluster: Option<String>,
    },
}

#[derive(Subcommand)]
enum ImageCommands {
    /// イメージ一覧
    List,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.api_key).with_poll(PollConfig::new(
            Duration::from_secs(self.poll_interval),
            Duration::from_secs(self.max_wait),
        ));
        if let Some(host) = self.host.as_deref().filter(|h| !h.is_empty()) {
            config = config.with_host(host);
        }
        if let Some(agent) = self.user_agent.as_deref().filter(|a| !a.is_empty()) {
            config = config.with_user_agent(agent);
        }
        config
    }
}

/// Ctrl-C で待機中の処理を中断する
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                eprintln!("{}", "中断しています...".yellow());
                token.cancel();
            }
            Err(e) => warn!(error = %e, "Ctrl-C ハンドラを登録できませんでした"),
        }
    });
    cancel
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrへ（stdoutはJSON出力に使う）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = cli.client_config();
    debug!(
        poll_interval_secs = cli.poll_interval,
        max_wait_secs = cli.max_wait,
        host = ?cli.host,
        "クライアントを初期化"
    );
    let client = ServerspaceClient::new(config)?.with_cancellation(cancel_on_ctrl_c());

    match cli.command {
        Commands::Task(TaskCommands::Wait { id }) => commands::task::handle_wait(&client, id).await,
        Commands::Domain(cmd) => match cmd {
            DomainCommands::List => commands::domain::handle_list(&client).await,
            DomainCommands::Get { name } => commands::domain::handle_get(&client, &name).await,
            DomainCommands::Create {
                name,
                migrate_records,
                wait,
            } => commands::domain::handle_create(&client, name, migrate_records, wait).await,
            DomainCommands::Delete { name, wait } => {
                commands::domain::handle_delete(&client, &name, wait).await
            }
        },
        Commands::Record(cmd) => match cmd {
            RecordCommands::List { domain } => {
                commands::record::handle_list(&client, &domain).await
            }
            RecordCommands::Create {
                domain,
                name,
                kind,
                value,
                ttl,
                priority,
                srv,
                wait,
            } => {
                let record =
                    commands::record::build_record(kind, name, value, ttl, priority, srv)?;
                commands::record::handle_create(&client, &domain, record, wait).await
            }
            RecordCommands::Delete { domain, id, wait } => {
                commands::record::handle_delete(&client, &domain, id, wait).await
            }
        },
        Commands::Network(cmd) => match cmd {
            NetworkCommands::List => commands::network::handle_list(&client).await,
            NetworkCommands::Get { id } => commands::network::handle_get(&client, &id).await,
            NetworkCommands::Create {
                name,
                location,
                prefix,
                mask,
                description,
                wait,
            } => {
                let request = fleetflow_cloud_serverspace::CreateNetworkRequest {
                    name,
                    location_id: location,
                    description,
                    network_prefix: prefix,
                    mask,
                };
                commands::network::handle_create(&client, request, wait).await
            }
            NetworkCommands::Delete { id, wait } => {
                commands::network::handle_delete(&client, &id, wait).await
            }
        },
        Commands::Gateway(cmd) => match cmd {
            GatewayCommands::List => output::print_json(&client.list_gateways().await?),
            GatewayCommands::Get { id } => output::print_json(&client.get_gateway(&id).await?),
        },
        Commands::K8s(cmd) => match cmd {
            K8sCommands::List => output::print_json(&client.list_kubernetes_clusters().await?),
            K8sCommands::Get { id } => {
                output::print_json(&client.get_kubernetes_cluster(&id).await?)
            }
            K8sCommands::Versions { cluster } => {
                let versions = match cluster {
                    Some(id) => client.get_available_kubernetes_versions(&id).await?,
                    None => client.get_kubernetes_versions().await?,
                };
                output::print_json(&versions)
            }
        },
        Commands::Image(ImageCommands::List) => output::print_json(&client.list_images().await?),
    }
}
