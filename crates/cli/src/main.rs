use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumixdump_core::{
    load_config, validate_config, ConfigOverrides, DiscoveryLoop, ExecutionContext,
    SoapConnector, SsdpDiscoverer, WhatToDownload,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

const COMMAND_HELP: &str = "\
Shell command run after each camera session ends.
Placeholders:
    ${camera}  friendly name of the camera
    ${n}       number of media objects downloaded and deleted
    ${total}   number of media objects the camera reported (- if unknown)
Write $$ for a literal dollar sign.";

const OUTPUT_DIR_HELP: &str = "\
Directory where the photos should be saved.
Required, but it may instead come from `output_dir` in the config file
or from the LUMIX_DUMP_OUTPUT_DIR environment variable.";

/// Downloads every photo and video from Lumix cameras on the network and
/// deletes each one from the camera once its files are verified.
#[derive(Parser, Debug)]
#[command(name = "lumix-upnp-dump")]
#[command(version)]
struct Cli {
    /// Directory where the photos should be saved (or set in config/env)
    #[arg(short, long = "output-dir", long_help = OUTPUT_DIR_HELP)]
    output_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long = "config-file")]
    config_file: Option<PathBuf>,

    /// Command to run after a camera session ends
    #[arg(long = "command-after-finish", long_help = COMMAND_HELP)]
    command_after_finish: Option<String>,

    /// Which renditions of a photo to download: jpeg, raw or both
    #[arg(long = "what-to-download")]
    what_to_download: Option<WhatToDownload>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output_dir: self.output_dir.clone(),
            command_after_finish: self.command_after_finish.clone(),
            what_to_download: self.what_to_download,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("lumix-upnp-dump {}", VERSION);

    let config = load_config(cli.config_file.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let context =
        ExecutionContext::from_config(&config).context("Failed to build HTTP client")?;
    let connect_timeout = config.downloader.connect_timeout();
    let discoverer = SsdpDiscoverer::new(
        reqwest_client(connect_timeout).context("Failed to build HTTP client")?,
    );
    let connector =
        SoapConnector::new(connect_timeout).context("Failed to build SOAP client")?;

    let discovery = DiscoveryLoop::new(
        config.discovery.clone(),
        context,
        Arc::new(discoverer),
        Arc::new(connector),
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down after the current scan");
        let _ = shutdown_tx.send(());
    });

    discovery.run(shutdown_rx).await;
    info!("Stopped");
    Ok(())
}

fn reqwest_client(connect_timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .build()
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
