//! HTTP/JSON to gRPC transcoding gateway.
//!
//! Re-exposes unary RPC methods as RESTful HTTP/JSON endpoints: an
//! incoming request is matched against a compiled route pattern, the
//! extracted path/query values are bound into a typed request message,
//! the call is dispatched in-process or over a shared channel, and the
//! outcome is forwarded back as an HTTP response.

pub mod bind;
pub mod config;
pub mod employees;
pub mod forward;
pub mod invoke;
pub mod pattern;
pub mod router;
pub mod server;

pub use config::{GatewayConfig, InvokeMode};
pub use invoke::{LocalInvoker, RemoteInvoker, RpcReply, UnaryInvoker};
pub use pattern::{Binding, RoutePattern};
pub use router::Gateway;
pub use server::{GatewayServer, GatewayState};
