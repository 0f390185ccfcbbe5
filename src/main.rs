//! clustermon daemon entry point.
//!
//! Wiring only: load and validate configuration, initialize logging and
//! telemetry, start the monitor driver and the status API, shut down on
//! SIGINT/SIGTERM. All monitoring logic lives in the library.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use url::Url;

use clustermon::config::{load_config, validate_config, MemberConfig, MonitorConfig};
use clustermon::config::watcher::ConfigWatcher;
use clustermon::api::ApiServer;
use clustermon::lifecycle::{signals, Shutdown};
use clustermon::metrics::report::render;
use clustermon::observability::{logging, telemetry};
use clustermon::Monitor;

#[derive(Parser)]
#[command(name = "clustermon")]
#[command(about = "Health and metrics monitor for a consensus key-value cluster", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated member URLs, overriding the config file's member list.
    #[arg(short, long)]
    endpoints: Option<String>,

    /// Run a single evaluation, print the report, and exit.
    #[arg(long)]
    oneshot: bool,
}

fn members_from_endpoints(list: &str) -> Vec<MemberConfig> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, url)| MemberConfig {
            name: Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(|h| format!("{}:{}", h, u.port().unwrap_or(0))))
                .unwrap_or_else(|| format!("member-{}", i + 1)),
            url: url.to_string(),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(endpoints) = &args.endpoints {
        config.members = members_from_endpoints(endpoints);
    }
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("configuration error: {}", error);
        }
        std::process::exit(1);
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        members = config.members.len(),
        interval_secs = config.evaluation.interval_secs,
        probe_timeout_ms = config.probe.timeout_ms,
        "Configuration loaded"
    );

    let monitor = Arc::new(Monitor::from_config(&config)?);

    if args.oneshot {
        monitor.evaluate_once().await;
        print!("{}", render(&monitor.status(), &monitor.metrics()));
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => telemetry::init_exporter(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    if config.api.enabled {
        let listener = TcpListener::bind(&config.api.bind_address).await?;
        let server = ApiServer::new(Arc::clone(&monitor), &config.api);
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = server.run(listener, rx).await {
                tracing::error!(error = %e, "Status API server failed");
            }
        });
    }

    // Keep the watcher alive for the life of the daemon.
    let mut _config_watcher: Option<notify::RecommendedWatcher> = None;
    if let Some(path) = &args.config {
        let (watcher, mut updates) = ConfigWatcher::new(path);
        _config_watcher = Some(watcher.run()?);
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move {
            while let Some(new_config) = updates.recv().await {
                monitor.apply_config(&new_config);
            }
        });
    }

    monitor.run(shutdown.subscribe()).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
