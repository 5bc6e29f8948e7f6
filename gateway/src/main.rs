//! Gateway main entry point.
//!
//! Serves RESTful HTTP/JSON in front of the employees RPC backend,
//! either in-process or over a gRPC channel depending on
//! `GATEWAY_MODE`.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::{server, GatewayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();
    tracing::info!("Starting Gateway v{}", config.version);
    tracing::info!("HTTP server listening on {}", config.http_addr);

    server::run(config).await?;
    Ok(())
}
