//! Common error types for the gateway and its backend services.
//!
//! This crate provides the status vocabulary shared between the HTTP
//! transcoding layer and the RPC services behind it: route faults
//! detected at registration time, gateway lifecycle errors, and the
//! fixed mapping from RPC status codes to HTTP responses.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonic::Code;

/// Route configuration faults.
///
/// Both variants are startup-only: they are raised while routes are
/// being registered, before the gateway accepts traffic, and abort
/// initialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid route pattern '{template}': {reason}")]
    InvalidPattern { template: String, reason: String },

    #[error("ambiguous route '{pattern}': overlaps previously registered '{existing}'")]
    AmbiguousRoute { pattern: String, existing: String },
}

impl RouteError {
    pub fn invalid(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            template: template.into(),
            reason: reason.into(),
        }
    }
}

/// Gateway lifecycle errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("failed to connect to backend: {0}")]
    Connect(#[source] tonic::transport::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("drain deadline exceeded with requests still in flight")]
    DrainTimedOut,
}

/// JSON error body returned to HTTP clients.
///
/// The shape is fixed: `{"code": "<status-kind>", "message": "<text>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Status kind in snake_case, e.g. `not_found`
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorBody {
    /// Create a new error body.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build the error body for an RPC status.
    pub fn from_status(status: &tonic::Status) -> Self {
        Self::new(code_label(status.code()), status.message())
    }
}

/// snake_case label for an RPC status code, used in JSON error bodies.
pub const fn code_label(code: Code) -> &'static str {
    match code {
        Code::Ok => "ok",
        Code::Cancelled => "cancelled",
        Code::Unknown => "unknown",
        Code::InvalidArgument => "invalid_argument",
        Code::DeadlineExceeded => "deadline_exceeded",
        Code::NotFound => "not_found",
        Code::AlreadyExists => "already_exists",
        Code::PermissionDenied => "permission_denied",
        Code::ResourceExhausted => "resource_exhausted",
        Code::FailedPrecondition => "failed_precondition",
        Code::Aborted => "aborted",
        Code::OutOfRange => "out_of_range",
        Code::Unimplemented => "unimplemented",
        Code::Internal => "internal",
        Code::Unavailable => "unavailable",
        Code::DataLoss => "data_loss",
        Code::Unauthenticated => "unauthenticated",
    }
}

/// Fixed RPC status code to HTTP status mapping.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        // Non-standard nginx code for client-closed-request; fall back
        // to 500 only if `http` ever rejects it.
        Code::Cancelled => {
            StatusCode::from_u16(499).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
        Code::Aborted => StatusCode::CONFLICT,
        Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Result type alias using GatewayError.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(http_status(Code::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(http_status(Code::InvalidArgument), StatusCode::BAD_REQUEST);
        assert_eq!(http_status(Code::PermissionDenied), StatusCode::FORBIDDEN);
        assert_eq!(http_status(Code::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(http_status(Code::Internal), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http_status(Code::Unknown), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http_status(Code::Cancelled).as_u16(), 499);
    }

    #[test]
    fn code_labels_are_snake_case() {
        assert_eq!(code_label(Code::NotFound), "not_found");
        assert_eq!(code_label(Code::InvalidArgument), "invalid_argument");
        assert_eq!(code_label(Code::PermissionDenied), "permission_denied");
    }

    #[test]
    fn error_body_shape() {
        let body = ErrorBody::from_status(&tonic::Status::not_found("no such employee"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "not_found");
        assert_eq!(json["message"], "no such employee");
    }
}
