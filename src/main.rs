use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tokio::sync::watch;
use tracing::info;

use usermon::config::{self, Config};
use usermon::server;
use usermon::system;
use usermon::system::cache;
use usermon::system::gpu::GpuProcessResolver;
use usermon::system::sampler::ProcessSampler;

#[derive(Parser)]
#[command(
    name = "usermon",
    about = "Per-user CPU/GPU/memory monitor with a web dashboard"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:5000
    #[arg(long, env = "USERMON_LISTEN")]
    listen: Option<String>,

    /// Seconds between sampling passes
    #[arg(long, env = "USERMON_INTERVAL")]
    sample_interval: Option<u64>,

    /// Disable GPU process attribution
    #[arg(long, default_value_t = false)]
    no_gpu: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usermon=info".parse().expect("static filter")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    let sampler = ProcessSampler::new(
        config.sampling.min_cpu_percent,
        config.sampling.min_memory_mb,
    );
    let resolver = GpuProcessResolver::new(
        config.gpu.enabled,
        Duration::from_secs(config.gpu.query_timeout_secs),
    );
    let (publisher, snapshot_cache) = cache::channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sampler_task = tokio::spawn(system::run_sampler(
        sampler,
        resolver,
        publisher,
        Duration::from_secs(config.sampling.interval_secs.max(1)),
        shutdown_rx,
    ));

    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .wrap_err_with(|| format!("invalid listen address `{}`", config.server.listen))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        interval_secs = config.sampling.interval_secs,
        gpu = config.gpu.enabled,
        "listening"
    );

    axum::serve(listener, server::router(snapshot_cache))
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .wrap_err("server error")?;

    let _ = sampler_task.await;
    Ok(())
}

async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
    let _ = shutdown_tx.send(true);
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };

    if let Some(ref listen) = cli.listen {
        config.server.listen = listen.clone();
    }
    if let Some(interval) = cli.sample_interval {
        config.sampling.interval_secs = interval;
    }
    if cli.no_gpu {
        config.gpu.enabled = false;
    }

    config
}
