//! Unary invocation over the backend, local or remote.
//!
//! Both execution modes sit behind [`UnaryInvoker`]: `RemoteInvoker`
//! carries the call over the shared gRPC channel, `LocalInvoker` calls
//! the server implementation directly with no network in between.
//! Cancellation propagates by dropping the invocation future; an
//! abandoned call never produces a reply.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use http::uri::PathAndQuery;
use tonic::codec::ProstCodec;
use tonic::metadata::{KeyAndValueRef, MetadataMap};
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

/// Outcome of a successful unary call: the response message plus the
/// header/trailer metadata that must reach the HTTP response before
/// the body does.
#[derive(Debug)]
pub struct RpcReply<T> {
    pub message: T,
    pub headers: MetadataMap,
    pub trailers: MetadataMap,
}

impl<T> RpcReply<T> {
    pub fn new(message: T) -> Self {
        Self {
            message,
            headers: MetadataMap::new(),
            trailers: MetadataMap::new(),
        }
    }
}

/// Append every entry of `src` onto `dst`.
///
/// Metadata from multiple sources is merged, never overwritten; a key
/// present in both keeps both value lists.
pub fn merge_metadata(dst: &mut MetadataMap, src: &MetadataMap) {
    for entry in src.iter() {
        match entry {
            KeyAndValueRef::Ascii(key, value) => {
                dst.append(key.clone(), value.clone());
            }
            KeyAndValueRef::Binary(key, value) => {
                dst.append_bin(key.clone(), value.clone());
            }
        }
    }
}

/// One unary backend call.
#[async_trait]
pub trait UnaryInvoker<Req, Resp>: Send + Sync {
    async fn invoke(&self, request: Request<Req>) -> Result<RpcReply<Resp>, Status>;
}

/// Invoker that forwards the call over a shared [`Channel`].
///
/// The channel is created once at gateway startup and multiplexes
/// concurrent calls internally; the invoker adds no locking of its
/// own. Configured outgoing metadata is attached to every call.
#[derive(Debug, Clone)]
pub struct RemoteInvoker {
    channel: Channel,
    method: PathAndQuery,
    metadata: MetadataMap,
}

impl RemoteInvoker {
    /// `method` is the full gRPC method path, e.g.
    /// `/employees.v1.EmployeesService/GetEmployee`.
    pub fn new(channel: Channel, method: &'static str) -> Self {
        Self {
            channel,
            method: PathAndQuery::from_static(method),
            metadata: MetadataMap::new(),
        }
    }

    /// Attach outgoing metadata to every call made by this invoker.
    pub fn with_metadata(mut self, metadata: MetadataMap) -> Self {
        self.metadata = metadata;
        self
    }

    /// Merge the configured metadata onto an outbound request,
    /// keeping whatever the caller already set.
    fn prepare<Req>(&self, mut request: Request<Req>) -> Request<Req> {
        merge_metadata(request.metadata_mut(), &self.metadata);
        request
    }
}

#[async_trait]
impl<Req, Resp> UnaryInvoker<Req, Resp> for RemoteInvoker
where
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    async fn invoke(&self, request: Request<Req>) -> Result<RpcReply<Resp>, Status> {
        let request = self.prepare(request);

        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| Status::unavailable(format!("service was not ready: {e}")))?;
        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response: Response<Resp> = grpc.unary(request, self.method.clone(), codec).await?;

        let (metadata, message, _extensions) = response.into_parts();
        let mut reply = RpcReply::new(message);
        merge_metadata(&mut reply.headers, &metadata);
        Ok(reply)
    }
}

/// Invoker that calls a server implementation in-process.
pub struct LocalInvoker<Req, Resp> {
    call: Box<
        dyn Fn(Request<Req>) -> BoxFuture<'static, Result<Response<Resp>, Status>> + Send + Sync,
    >,
}

impl<Req, Resp> LocalInvoker<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    /// Bind one method of a server implementation:
    ///
    /// ```ignore
    /// LocalInvoker::new(server, |s, req| async move { s.get_employee(req).await })
    /// ```
    pub fn new<S, F, Fut>(server: Arc<S>, method: F) -> Self
    where
        S: Send + Sync + 'static,
        F: Fn(Arc<S>, Request<Req>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Response<Resp>, Status>> + Send + 'static,
    {
        Self {
            call: Box::new(move |request| Box::pin(method(server.clone(), request))),
        }
    }
}

#[async_trait]
impl<Req, Resp> UnaryInvoker<Req, Resp> for LocalInvoker<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    async fn invoke(&self, request: Request<Req>) -> Result<RpcReply<Resp>, Status> {
        let response = (self.call)(request).await?;
        let (metadata, message, _extensions) = response.into_parts();
        let mut reply = RpcReply::new(message);
        merge_metadata(&mut reply.headers, &metadata);
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::{GetEmployeeRequest, GetEmployeeResponse, GET_EMPLOYEE_METHOD};
    use tonic::metadata::MetadataValue;
    use tonic::transport::Endpoint;

    // Nothing listens on port 1; the channel only dials on first use.
    fn dead_channel() -> Channel {
        Endpoint::from_static("http://127.0.0.1:1").connect_lazy()
    }

    #[test]
    fn merge_keeps_both_value_lists() {
        let mut dst = MetadataMap::new();
        dst.append("x-request-id", MetadataValue::from_static("a"));
        let mut src = MetadataMap::new();
        src.append("x-request-id", MetadataValue::from_static("b"));
        src.append("x-extra", MetadataValue::from_static("c"));

        merge_metadata(&mut dst, &src);

        let ids: Vec<_> = dst.get_all("x-request-id").iter().collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(dst.get("x-extra").unwrap(), "c");
    }

    #[tokio::test]
    async fn configured_metadata_lands_on_outbound_request() {
        let mut configured = MetadataMap::new();
        configured.insert("x-api-key", MetadataValue::from_static("secret"));
        configured.insert("x-request-id", MetadataValue::from_static("b"));
        let invoker =
            RemoteInvoker::new(dead_channel(), GET_EMPLOYEE_METHOD).with_metadata(configured);

        let mut request = Request::new(GetEmployeeRequest::default());
        request
            .metadata_mut()
            .insert("x-request-id", MetadataValue::from_static("a"));
        let prepared = invoker.prepare(request);

        assert_eq!(prepared.metadata().get("x-api-key").unwrap(), "secret");
        let ids: Vec<_> = prepared.metadata().get_all("x-request-id").iter().collect();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn remote_invoker_reports_unreachable_backend() {
        let invoker = RemoteInvoker::new(dead_channel(), GET_EMPLOYEE_METHOD);
        let err = UnaryInvoker::<GetEmployeeRequest, GetEmployeeResponse>::invoke(
            &invoker,
            Request::new(GetEmployeeRequest {
                short_name: "Tom".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), tonic::Code::Unavailable);
    }

    struct Doubler;

    impl Doubler {
        async fn double(&self, request: Request<i64>) -> Result<Response<i64>, Status> {
            let n = request.into_inner();
            if n < 0 {
                return Err(Status::invalid_argument("negative input"));
            }
            let mut response = Response::new(n * 2);
            response
                .metadata_mut()
                .insert("x-doubled", MetadataValue::from_static("true"));
            Ok(response)
        }
    }

    #[tokio::test]
    async fn local_invoker_calls_directly() {
        let invoker = LocalInvoker::new(Arc::new(Doubler), |s, req| async move {
            s.double(req).await
        });
        let reply = invoker.invoke(Request::new(21)).await.unwrap();
        assert_eq!(reply.message, 42);
        assert_eq!(reply.headers.get("x-doubled").unwrap(), "true");
        assert!(reply.trailers.is_empty());
    }

    #[tokio::test]
    async fn local_invoker_surfaces_status() {
        let invoker = LocalInvoker::new(Arc::new(Doubler), |s, req| async move {
            s.double(req).await
        });
        let err = invoker.invoke(Request::new(-1)).await.unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
    }
}
