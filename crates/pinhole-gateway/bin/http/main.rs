mod cli;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use pinhole_gateway::{App, AppState, SERVICE_NAME};
use pinhole_generator::RandomGenerator;
use pinhole_shortener::{ShortenerService, ShortenerSettings};
use pinhole_storage::InMemoryRegistry;
use pinhole_telemetry::{
    init_tracing, HttpLogSink, HttpLogSinkSettings, LocalSink, LogSink, TracingConfig,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const RELAY_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _guard = init_tracing(
        TracingConfig::new(SERVICE_NAME)
            .with_format(config.log_format)
            .with_otlp_endpoint(config.otlp_endpoint.clone()),
    )?;

    let listen_addr = config.listen_addr();
    let base_url = config.public_base_url();

    info!(
        listen_addr = %listen_addr,
        public_base_url = %base_url,
        log_relay = !config.no_log_relay,
        "starting gateway server"
    );

    let (log_sink, relay_worker) = log_sink(&config)?;

    let settings = ShortenerSettings::builder()
        .default_validity_minutes(config.default_validity_minutes)
        .max_generate_attempts(config.max_generate_attempts)
        .build();
    let shortener = ShortenerService::new(InMemoryRegistry::new(), RandomGenerator::default())
        .with_settings(settings);

    let state = AppState::new(Arc::new(shortener), base_url, log_sink);
    let app = App::router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and every sink handle it held) is gone; let queued events flush.
    if let Some(worker) = relay_worker {
        if tokio::time::timeout(RELAY_DRAIN_TIMEOUT, worker).await.is_err() {
            warn!("log relay did not drain before shutdown");
        }
    }

    info!("gateway stopped");
    Ok(())
}

fn log_sink(config: &CLI) -> anyhow::Result<(Arc<dyn LogSink>, Option<JoinHandle<()>>)> {
    if config.no_log_relay {
        return Ok((Arc::new(LocalSink), None));
    }

    let (sink, worker) = HttpLogSink::spawn(
        HttpLogSinkSettings::builder()
            .collector_url(config.log_collector_url.clone())
            .build(),
    )
    .context("failed to start log relay")?;
    info!(collector_url = %config.log_collector_url, "relaying audit events");

    Ok((Arc::new(sink), Some(worker)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
