//! Announcement service: REST lookup over a Google Sheets dataset.

use announce_service::config::Config;
use announce_service::startup::build_app;
use announce_telemetry::{init_metrics, setup_telemetry};
use tokio::signal;
use tracing::info;

/// Build version (injected at compile time)
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::init()?;
    let telemetry = setup_telemetry(&config.telemetry_config());
    let metrics_handle = init_metrics();

    info!(
        version = VERSION,
        address = %config.listen_address,
        range = %config.sheets_range,
        otlp = config.otlp_endpoint.is_some(),
        pid = std::process::id(),
        "Starting announce-service"
    );

    let (app, addr) = build_app(&config, metrics_handle)?;

    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown();
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
