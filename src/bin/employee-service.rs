//! Direct employee CRUD service.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use employee_gateway::config::load_or_default;
use employee_gateway::employees::{EmployeeStore, MemoryStore};
use employee_gateway::lifecycle::{signals, Shutdown};
use employee_gateway::observability::{logging, metrics};
use employee_gateway::ServiceServer;

#[derive(Parser)]
#[command(name = "employee-service")]
#[command(about = "HTTP CRUD service over the employee collection", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "EMPLOYEE_GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init(&config.observability);
    tracing::info!("employee-service v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.service.metrics_address.parse()?)?;
    }

    let collection = config.service.collection.clone();
    let store: Arc<dyn EmployeeStore> = match &config.service.seed_path {
        Some(path) => Arc::new(MemoryStore::from_seed_file(collection, path).await?),
        None => Arc::new(MemoryStore::new(collection)),
    };

    let listener = TcpListener::bind(&config.service.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    ServiceServer::new(&config, store)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
