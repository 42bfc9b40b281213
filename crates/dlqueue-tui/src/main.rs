use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dlqueue_proto::{config::Config, platform};
use dlqueue_tui::api::HttpApi;
use dlqueue_tui::app::App;
use dlqueue_tui::file_actions::ProcessPlayer;

#[derive(Parser, Debug)]
#[command(name = "dlq", version, about = "Terminal client for a download queue server")]
struct Args {
    /// Base URL of the queue server, e.g. http://192.168.1.10:5000
    #[arg(long)]
    server: Option<String>,

    /// Seconds between status polls.
    #[arg(long)]
    interval: Option<u64>,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("dlq.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // The terminal belongs to the UI; point the operator at the log instead.
    eprintln!("dlq log: {}", log_path.display());
    tracing::info!("dlq starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {}", e);
            Config::default()
        }),
    };
    if let Some(server) = args.server {
        config.server.base_url = server;
    }
    if let Some(interval) = args.interval {
        config.polling.interval_secs = interval;
    }
    tracing::info!(
        "server {} every {:?}",
        config.server.base_url,
        config.polling.interval()
    );

    let api = HttpApi::new(&config.server.base_url, config.server.request_timeout())?;
    let player = ProcessPlayer::new(config.player.command.clone(), config.player.args.clone());

    let (app, inbox) = App::new(Arc::new(api), Box::new(player), &config);
    app.run(inbox).await?;

    Ok(())
}
