//! Telemetry Fan-out Server - Binary Entry Point

use std::process::ExitCode;

use clap::Parser;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use telemetry_fanout::{Cli, TelemetryResult, TelemetryServer};

const DEFAULT_LOG_FILTER: &str = "telemetry_fanout=info,telemetry_server=info";

#[tokio::main]
async fn main() -> ExitCode {
    // Clap reports a bad port and exits before anything starts
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "telemetry server failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> TelemetryResult<()> {
    let config = cli.into_config()?;
    let server = TelemetryServer::bind(config).await?;

    // Ctrl+C / SIGTERM resolves the shutdown future once
    let (tx, rx) = oneshot::channel::<()>();
    let tx = Mutex::new(Some(tx));
    ctrlc::set_handler(move || {
        if let Some(tx) = tx.lock().take() {
            let _ = tx.send(());
        }
    })?;

    server
        .run(async move {
            let _ = rx.await;
        })
        .await
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
