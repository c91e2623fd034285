//! HTTP forwarding gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                   GATEWAY                     │
//!     Client Request      │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!     ────────────────────┼─▶│ security │──▶│   http   │──▶│ gateway  │──┼──▶ Downstream
//!                         │  │ CORS     │   │ handlers │   │ forwarder│  │    Service
//!     Client Response     │  └──────────┘   └──────────┘   └────┬─────┘  │
//!     ◀───────────────────┼───────────────── response.rs ◀──────┘        │
//!                         │                                              │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use gateway_forwarder::config::load_config;
use gateway_forwarder::http::HttpServer;
use gateway_forwarder::lifecycle::Shutdown;
use gateway_forwarder::observability::logging;

#[derive(Parser)]
#[command(name = "gateway-forwarder")]
#[command(about = "Forwards authenticated calls to downstream services", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref())?;

    logging::init(&loaded.config.observability.log_level)?;
    tracing::info!("gateway-forwarder v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %loaded.config.listener.bind_address,
        upstream = %loaded.config.upstream.base_url,
        allow_any_origin = loaded.allow_list.allows_any(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&loaded.config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(loaded);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
