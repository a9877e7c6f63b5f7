use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use front_controller::config::{load_config, AppConfig};
use front_controller::observability::{logging, metrics};
use front_controller::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "front-controller")]
#[command(about = "Route every request through one URL dispatcher", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("front-controller v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        routes = config.routes.len(),
        debug = config.debug,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
