//! Employee forwarding gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ /function-N ──▶ route table ──▶ forwarder ──▶ remote function
//!   Client ◀── status + headers + streamed body ◀──────────────────┘
//! ```
//!
//! Every configured route maps one local path and method to one remote URL.
//! Configuration comes from `--config` / `EMPLOYEE_GATEWAY_CONFIG`, or
//! built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use employee_gateway::config::load_or_default;
use employee_gateway::lifecycle::{signals, Shutdown};
use employee_gateway::observability::{logging, metrics};
use employee_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "employee-gateway")]
#[command(about = "Forwards local routes to remote employee functions", long_about = None)]
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
    tracing::info!("employee-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        connect_timeout_secs = config.timeouts.connect_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = GatewayServer::new(&config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
