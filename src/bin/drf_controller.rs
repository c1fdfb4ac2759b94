use clap::Parser;
use drf_controller::Config;
use kube::Client;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

/// External DRF priority controller for a Kubernetes batch job queue.
///
/// Configuration is read from the environment (`KUEUE_ENABLED`,
/// `SCHEDULING_INTERVAL`, `DRF_AGING_ALPHA`, ...); the flags below let a
/// local run override individual values without exporting variables.
#[derive(Parser, Debug)]
#[command(name = "drf-controller", about = "DRF-based priority controller for Kueue workloads")]
struct Cli {
    /// Disable the Queue Updater; the loop still scores and logs each tick.
    #[arg(long)]
    no_kueue: bool,

    /// Seconds between reconciliation ticks.
    #[arg(long)]
    interval: Option<u64>,

    /// Aging constant applied to each job's dominant share.
    #[arg(long)]
    aging_alpha: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if cli.no_kueue {
        config.kueue_enabled = false;
    }
    if let Some(interval) = cli.interval {
        config.scheduling_interval_secs = interval.max(1);
    }
    if let Some(alpha) = cli.aging_alpha {
        config.aging_alpha = alpha;
    }

    tracing::info!(
        kueue_enabled = config.kueue_enabled,
        interval = config.scheduling_interval_secs,
        "starting DRF controller",
    );

    let client = Client::try_default()
        .await
        .map_err(|err| anyhow::anyhow!(drf_controller::ControllerError::KubeClient(err.to_string())))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_handle = tokio::spawn(drf_controller::run(client, config, shutdown_rx));

    shutdown_signal().await;
    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
    let _ = loop_handle.await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl_c");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
