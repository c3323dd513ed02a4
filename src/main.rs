use std::path::PathBuf;

use clap::Parser;
use queue_admin::config::AdminConfig;
use queue_admin::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "queue-admin", about = "Queue listener control plane and message gateway")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "QUEUE_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated queue names (overrides the config file).
    #[arg(long, env = "QUEUE_ADMIN_QUEUES")]
    queues: Option<String>,

    /// Address to bind the HTTP server to.
    #[arg(long)]
    bind: Option<String>,

    /// Port for the HTTP server.
    #[arg(long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_ansi(true))
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AdminConfig> {
    let mut config = match &cli.config {
        Some(path) => AdminConfig::load(path)?,
        None => AdminConfig::default(),
    };
    if let Some(queues) = &cli.queues {
        config.apply_queue_list(queues);
    }
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = load_config(&cli)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        queues = ?config.queues,
        "queue-admin starting"
    );

    let runtime = Runtime::in_memory(&config)?;
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let served =
        queue_admin::http::serve_with_shutdown(runtime.admin.clone(), &addr, shutdown_signal())
            .await;

    tokio::task::spawn_blocking(move || runtime.shutdown()).await??;
    served?;
    Ok(())
}
