use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use formdrop::config::{self, AppConfig};
use formdrop::lifecycle::Shutdown;
use formdrop::observability;
use formdrop::relay::{RelayClient, RelayServer};
use formdrop::store::{RecordStore, SqliteStore};
use formdrop::HttpServer;

#[derive(Parser, Debug)]
#[command(
    name = "formdrop",
    about = "Form submission pipeline: HTTP front door relaying to a TCP record sink"
)]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };

    tracing::info!(
        http_address = %config.http.bind_address,
        relay_address = %config.relay.bind_address,
        db_path = %config.storage.db_path,
        max_relay_connections = config.relay.max_connections,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::new(&config.storage.db_path));
    let shutdown = Shutdown::new();

    // Relay listener first: the front door relays into it.
    let relay_listener = TcpListener::bind(&config.relay.bind_address).await?;
    let relay_server = RelayServer::new(config.relay.clone(), Arc::clone(&store));
    let relay_task = tokio::spawn(relay_server.run(relay_listener, shutdown.subscribe()));

    let http_listener = TcpListener::bind(&config.http.bind_address).await?;
    let http_server = HttpServer::new(&config.http, RelayClient::new(&config.relay));
    let http_task = tokio::spawn(http_server.run(http_listener, shutdown.subscribe()));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    shutdown.trigger();

    let _ = relay_task.await;
    if let Ok(Err(e)) = http_task.await {
        tracing::error!(error = %e, "HTTP server exited with error");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
