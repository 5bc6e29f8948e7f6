//! Serving lifecycle.
//!
//! A gateway instance moves through `Unstarted -> ConnectingBackend ->
//! Serving -> Draining -> Closed`. Backend connect failure is fatal;
//! draining stops accepting connections, lets in-flight requests
//! finish within the configured deadline, and then the backend channel
//! is dropped with the gateway — closed exactly once.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use employees_service::EmployeeDirectory;
use error::GatewayError;
use tokio::net::TcpListener;

use crate::config::{GatewayConfig, InvokeMode};
use crate::employees;
use crate::router::Gateway;

/// Lifecycle states of one gateway instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Unstarted,
    ConnectingBackend,
    Serving,
    Draining,
    Closed,
}

impl fmt::Display for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unstarted => "unstarted",
            Self::ConnectingBackend => "connecting_backend",
            Self::Serving => "serving",
            Self::Draining => "draining",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A bound HTTP server wrapping a registered gateway.
pub struct GatewayServer {
    router: axum::Router,
    listener: TcpListener,
    drain_timeout: Duration,
}

impl GatewayServer {
    /// Bind the listen socket. Registration must already be complete;
    /// the route table is immutable from here on.
    pub async fn bind(
        addr: &str,
        gateway: Gateway,
        drain_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            router: gateway.into_router(),
            listener,
            drain_timeout,
        })
    }

    /// The bound address, useful with an ephemeral port.
    pub fn local_addr(&self) -> Result<SocketAddr, GatewayError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then drain.
    ///
    /// Returns `Ok(())` when draining finished before the deadline and
    /// `GatewayError::DrainTimedOut` when in-flight requests had to be
    /// aborted.
    pub async fn serve_with_shutdown(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), GatewayError> {
        let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();

        tracing::info!(state = %GatewayState::Serving, "gateway serving");
        let serve = axum::serve(self.listener, self.router).with_graceful_shutdown(async move {
            shutdown.await;
            let _ = drain_tx.send(());
        });
        let mut task = tokio::spawn(serve.into_future());

        tokio::select! {
            result = &mut task => {
                join_result(result)?;
                tracing::info!(state = %GatewayState::Closed, "gateway stopped");
                Ok(())
            }
            _ = drain_rx => {
                tracing::info!(state = %GatewayState::Draining, "shutdown signal received");
                match tokio::time::timeout(self.drain_timeout, &mut task).await {
                    Ok(result) => {
                        join_result(result)?;
                        tracing::info!(state = %GatewayState::Closed, "drain complete");
                        Ok(())
                    }
                    Err(_) => {
                        task.abort();
                        tracing::warn!("drain deadline exceeded, aborting in-flight requests");
                        Err(GatewayError::DrainTimedOut)
                    }
                }
            }
        }
    }
}

fn join_result(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), GatewayError> {
    match result {
        Ok(io_result) => io_result.map_err(GatewayError::Io),
        Err(join_err) => Err(GatewayError::Io(std::io::Error::other(join_err))),
    }
}

/// Build, connect and serve a gateway per the configuration, shutting
/// down on ctrl-c.
pub async fn run(config: GatewayConfig) -> Result<(), GatewayError> {
    tracing::info!(state = %GatewayState::Unstarted, version = %config.version, "starting gateway");

    let mut gateway = Gateway::new();
    // Holds the backend channel for the serving lifetime in remote
    // mode; dropped after drain.
    let _channel = match config.mode {
        InvokeMode::Local => {
            tracing::info!("registering in-process employees backend");
            employees::register_server(
                &mut gateway,
                Arc::new(EmployeeDirectory::with_sample_data()),
            )?;
            None
        }
        InvokeMode::Remote => {
            tracing::info!(
                state = %GatewayState::ConnectingBackend,
                backend = %config.backend_addr,
                "dialing backend"
            );
            Some(employees::register_from_endpoint(&mut gateway, &config.backend_addr).await?)
        }
    };

    let server = GatewayServer::bind(&config.http_addr, gateway, config.drain_timeout).await?;
    tracing::info!(addr = %server.local_addr()?, "HTTP listener bound");

    server
        .serve_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
