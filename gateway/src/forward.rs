//! Response forwarding: RPC outcome to HTTP response.
//!
//! Success replies become `200` with a JSON body; status errors go
//! through the fixed code table in the `error` crate. A marshaling
//! failure on either path degrades to a static 500 body so a response
//! is always written.

use axum::body::Body;
use axum::response::Response;
use error::ErrorBody;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::Serialize;
use tonic::metadata::KeyAndValueRef;
use tonic::Status;

use crate::invoke::RpcReply;

static FALLBACK_BODY: &str = r#"{"code":"internal","message":"failed to marshal response"}"#;

/// Forward a successful reply: header metadata first, then status
/// line, then the serialized message body.
pub fn success<T: Serialize>(reply: &RpcReply<T>) -> Response {
    let body = match serde_json::to_vec(&reply.message) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "failed to marshal response message");
            return fallback();
        }
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::OK;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    apply_metadata(&mut response, reply);
    response
}

/// Forward a status error through the fixed code table.
pub fn status_error(status: &Status) -> Response {
    let http_status = error::http_status(status.code());
    let body = ErrorBody::from_status(status);
    let body = match serde_json::to_vec(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "failed to marshal error body");
            return fallback();
        }
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = http_status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Copy ASCII header metadata onto the HTTP response.
///
/// Binary (`-bin`) entries belong to the RPC layer and are skipped;
/// trailers have no HTTP/1.1 representation and are dropped here.
fn apply_metadata<T>(response: &mut Response, reply: &RpcReply<T>) {
    for entry in reply.headers.iter() {
        if let KeyAndValueRef::Ascii(key, value) = entry {
            let name = match HeaderName::from_bytes(key.as_str().as_bytes()) {
                Ok(name) => name,
                Err(_) => continue,
            };
            if let Ok(value) = HeaderValue::from_bytes(value.as_bytes()) {
                response.headers_mut().append(name, value);
            }
        }
    }
}

fn fallback() -> Response {
    let mut response = Response::new(Body::from(FALLBACK_BODY));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
