//! tamperd: header tamper engine behind an HTTP host bridge.
//!
//! # Architecture Overview
//!
//! ```text
//! host shim (webRequest hooks, page messages)
//!     │  POST /hooks/intercept | /hooks/headers-send
//!     │       /hooks/headers-received | /command
//!     ▼
//! http bridge (axum) ──▶ driver ──▶ store (direct + patterns)
//!     │                    │
//!     │                    └──▶ headers / codec
//!     ▼
//! JSON outcome back to the host
//!
//! config · logging · metrics · shutdown
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use tamper_engine::config::{load_config, TamperConfig};
use tamper_engine::lifecycle::{signals, Shutdown};
use tamper_engine::observability::{logging, metrics};
use tamper_engine::HttpServer;

#[derive(Parser)]
#[command(name = "tamperd")]
#[command(about = "Header tamper engine with an HTTP host bridge", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => TamperConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("tamperd v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        redirect_statuses = ?config.engine.redirect_statuses,
        preset_patterns = config.patterns.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move { signals::shutdown_on_signal(&shutdown).await }
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
