mod cli;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use pinhole_collector::{App, LogStore, SERVICE_NAME};
use pinhole_telemetry::{init_tracing, TracingConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _guard = init_tracing(
        TracingConfig::new(SERVICE_NAME)
            .with_format(config.log_format)
            .with_otlp_endpoint(config.otlp_endpoint.clone()),
    )?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "starting log collector");

    axum::serve(listener, App::router(LogStore::new()))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("log collector stopped");
    Ok(())
}
