/*!
 * redstrip server binary.
 *
 * Connects to a TP-Link Kasa power strip (directly or via discovery) and
 * serves it as a Redfish-shaped resource tree over HTTP.
 */
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use redstrip_core::config::Config;
use redstrip_core::logging;
use redstrip_device::{discover, DeviceGateway, KasaStrip};
use redstrip_server::router;

/// Redfish REST bridge for TP-Link Kasa smart power strips
#[derive(Debug, Parser)]
#[command(name = "redstrip", version, about)]
struct Args {
    /// Address of the power strip; auto-discover when not given
    #[arg(long)]
    device_addr: Option<String>,

    /// Host to bind the HTTP server to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Path to a configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(addr) = args.device_addr {
        config.device.address = Some(addr);
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init_with_filter(&config.logging.level).context("Failed to initialize logging")?;

    let strip = match KasaStrip::from_config(&config.device)? {
        Some(strip) => {
            info!("Connecting to power strip at {}", strip.addr());
            strip
        }
        None => {
            info!("No device address configured, discovering on the local network");
            discover(Duration::from_secs(config.device.discovery_timeout_secs))
                .await
                .context("No power strip found; check the device address and network")?
        }
    };

    let gateway = Arc::new(DeviceGateway::new(
        strip,
        Duration::from_secs(config.device.io_timeout_secs),
    ));

    // Fail fast when the strip is unreachable at startup; once serving,
    // unreachability surfaces per request as 503.
    let snapshot = gateway
        .refresh()
        .await
        .context("Could not reach the power strip")?;
    info!(
        "Connected to '{}' ({}) with {} outlets",
        snapshot.alias,
        snapshot.model,
        snapshot.outlets.len()
    );

    let app = router(gateway);
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    info!(
        "Serving Redfish API on {}:{}",
        config.server.host, config.server.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
