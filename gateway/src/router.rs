//! Route table and request dispatch.
//!
//! Registration ties a [`RoutePattern`] to one type-erased handler
//! built from a (binder, invoker, forwarder) triple. The table is
//! append-only, populated before serving, and read-only afterwards, so
//! no synchronization is needed on the request path.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Json;
use bytes::Bytes;
use error::RouteError;
use futures_util::future::BoxFuture;
use http::{Method, Uri};
use http_body_util::BodyExt;
use serde::Serialize;
use tonic::{Request, Status};

use crate::bind::QueryParams;
use crate::forward;
use crate::invoke::UnaryInvoker;
use crate::pattern::{Binding, RoutePattern};

type HandlerFuture = BoxFuture<'static, Response>;

/// Type-erased request pipeline: bind, invoke, forward.
pub type Handler = Arc<dyn Fn(Binding, QueryParams, Bytes) -> HandlerFuture + Send + Sync>;

struct Route {
    pattern: RoutePattern,
    handler: Handler,
}

/// Mapping from route patterns to their handlers.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Append a route, rejecting patterns that could match the same
    /// concrete path as an already-registered same-verb pattern.
    pub fn register(&mut self, pattern: RoutePattern, handler: Handler) -> Result<(), RouteError> {
        if let Some(existing) = self
            .routes
            .iter()
            .find(|r| r.pattern.verb() == pattern.verb() && r.pattern.overlaps(&pattern))
        {
            return Err(RouteError::AmbiguousRoute {
                pattern: pattern.template().to_string(),
                existing: existing.pattern.template().to_string(),
            });
        }
        self.routes.push(Route { pattern, handler });
        Ok(())
    }

    fn find(&self, verb: &Method, path: &str) -> Option<(&Route, Binding)> {
        self.routes
            .iter()
            .filter(|r| r.pattern.verb() == verb)
            .find_map(|r| r.pattern.match_path(path).map(|binding| (r, binding)))
    }
}

/// The transcoding gateway: an immutable route table dispatched from
/// the HTTP server.
#[derive(Default)]
pub struct Gateway {
    table: RouteTable,
}

impl Gateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one RPC method under a route pattern.
    ///
    /// `binder` turns extracted path/query/body data into the typed
    /// request; `invoker` performs the call; forwarding is shared. The
    /// triple is erased into a single boxed handler, so every method
    /// reuses one pipeline instead of carrying its own handler fn.
    pub fn register<Req, Resp, B, I>(
        &mut self,
        pattern: RoutePattern,
        binder: B,
        invoker: I,
    ) -> Result<(), RouteError>
    where
        Req: Send + 'static,
        Resp: Serialize + Send + 'static,
        B: Fn(&Binding, &QueryParams, &[u8]) -> Result<Req, Status> + Send + Sync + 'static,
        I: UnaryInvoker<Req, Resp> + 'static,
    {
        let invoker = Arc::new(invoker);
        let handler: Handler = Arc::new(move |binding, query, body| {
            let bound = binder(&binding, &query, &body);
            let invoker = invoker.clone();
            Box::pin(async move {
                let request = match bound {
                    Ok(request) => request,
                    Err(status) => return forward::status_error(&status),
                };
                match invoker.invoke(Request::new(request)).await {
                    Ok(reply) => forward::success(&reply),
                    Err(status) => forward::status_error(&status),
                }
            })
        });
        self.table.register(pattern, handler)
    }

    /// Resolve a verb and concrete path to a handler and its binding.
    pub fn resolve(&self, verb: &Method, path: &str) -> Option<(Handler, Binding)> {
        self.table
            .find(verb, path)
            .map(|(route, binding)| (route.handler.clone(), binding))
    }

    /// Dispatch one request through match, bind, invoke and forward.
    pub async fn handle(&self, verb: &Method, uri: &Uri, body: Bytes) -> Response {
        let path = uri.path();
        let query: QueryParams =
            url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
                .into_owned()
                .collect();

        let response = match self.table.find(verb, path) {
            Some((route, binding)) => {
                let response = (route.handler)(binding, query, body).await;
                tracing::info!(
                    method = %verb,
                    path = %path,
                    pattern = %route.pattern.template(),
                    status = response.status().as_u16(),
                    "request dispatched"
                );
                response
            }
            None => {
                tracing::info!(method = %verb, path = %path, "no route matched");
                forward::status_error(&Status::not_found("Not Found"))
            }
        };
        response
    }

    /// Wrap the gateway in an axum router with a liveness probe.
    pub fn into_router(self) -> axum::Router {
        axum::Router::new()
            .route("/healthz", get(healthz))
            .fallback(dispatch)
            .with_state(Arc::new(self))
    }
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "healthy": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn dispatch(
    State(gateway): State<Arc<Gateway>>,
    request: http::Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return forward::status_error(&Status::invalid_argument(format!(
                "failed to read request body: {e}"
            )));
        }
    };
    gateway.handle(&parts.method, &parts.uri, bytes).await
}
