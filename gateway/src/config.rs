//! Gateway configuration.

use std::time::Duration;

/// How the gateway reaches the employees backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeMode {
    /// Direct in-process calls, no network
    Local,
    /// Unary calls over a gRPC channel
    Remote,
}

impl std::str::FromStr for InvokeMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "local" => Ok(InvokeMode::Local),
            "remote" => Ok(InvokeMode::Remote),
            other => Err(format!("unrecognized mode '{other}'")),
        }
    }
}

/// Gateway configuration, loaded from `GATEWAY_*` environment
/// variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP listen address
    pub http_addr: String,
    /// Backend gRPC endpoint (remote mode only)
    pub backend_addr: String,
    /// Execution mode for backend calls
    pub mode: InvokeMode,
    /// How long draining may take before shutdown is forced
    pub drain_timeout: Duration,
    /// Crate version, reported by the liveness probe and startup log
    pub version: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let mode = match std::env::var("GATEWAY_MODE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!("GATEWAY_MODE: {}, falling back to local", e);
                InvokeMode::Local
            }),
            Err(_) => InvokeMode::Local,
        };
        let drain_secs = std::env::var("GATEWAY_DRAIN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        Self {
            http_addr: std::env::var("GATEWAY_HTTP_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8081".to_string()),
            backend_addr: std::env::var("GATEWAY_BACKEND_ADDR")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
            mode,
            drain_timeout: Duration::from_secs(drain_secs),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:8081".to_string(),
            backend_addr: "http://127.0.0.1:8080".to_string(),
            mode: InvokeMode::Local,
            drain_timeout: Duration::from_secs(10),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
