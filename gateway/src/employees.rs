//! Route registration for `employees.v1.EmployeesService`.
//!
//! Wires the service's methods into the gateway in both execution
//! modes: direct in-process calls against a server implementation, or
//! unary calls over a shared channel to a remote backend.

use std::sync::Arc;

use error::{GatewayError, RouteError};
use http::Method;
use proto::{
    EmployeesService, GetEmployeeRequest, GetEmployeeResponse, ListEmployeesRequest,
    ListEmployeesResponse, GET_EMPLOYEE_METHOD, LIST_EMPLOYEES_METHOD,
};
use tonic::transport::{Channel, Endpoint};

use crate::bind;
use crate::invoke::{LocalInvoker, RemoteInvoker};
use crate::pattern::RoutePattern;
use crate::router::Gateway;

const GET_EMPLOYEE_TEMPLATE: &str = "/employees/v1/get_employee/{short_name}";
const LIST_EMPLOYEES_TEMPLATE: &str = "/employees/v1/list_employees";

/// Register the employee routes against a remote backend channel.
///
/// The channel is shared by every request task; it multiplexes
/// concurrent calls internally.
pub fn register_client(gateway: &mut Gateway, channel: Channel) -> Result<(), RouteError> {
    gateway.register::<GetEmployeeRequest, GetEmployeeResponse, _, _>(
        RoutePattern::parse(Method::GET, GET_EMPLOYEE_TEMPLATE)?,
        |binding, _query, _body| {
            Ok(GetEmployeeRequest {
                short_name: bind::required(binding, "short_name")?,
            })
        },
        RemoteInvoker::new(channel.clone(), GET_EMPLOYEE_METHOD),
    )?;

    gateway.register::<ListEmployeesRequest, ListEmployeesResponse, _, _>(
        RoutePattern::parse(Method::GET, LIST_EMPLOYEES_TEMPLATE)?,
        |_binding, _query, _body| Ok(ListEmployeesRequest::default()),
        RemoteInvoker::new(channel, LIST_EMPLOYEES_METHOD),
    )?;

    Ok(())
}

/// Register the employee routes against an in-process server
/// implementation, bypassing the network.
pub fn register_server<S: EmployeesService>(
    gateway: &mut Gateway,
    server: Arc<S>,
) -> Result<(), RouteError> {
    gateway.register::<GetEmployeeRequest, GetEmployeeResponse, _, _>(
        RoutePattern::parse(Method::GET, GET_EMPLOYEE_TEMPLATE)?,
        |binding, _query, _body| {
            Ok(GetEmployeeRequest {
                short_name: bind::required(binding, "short_name")?,
            })
        },
        LocalInvoker::new(server.clone(), |s, req| async move {
            s.get_employee(req).await
        }),
    )?;

    gateway.register::<ListEmployeesRequest, ListEmployeesResponse, _, _>(
        RoutePattern::parse(Method::GET, LIST_EMPLOYEES_TEMPLATE)?,
        |_binding, _query, _body| Ok(ListEmployeesRequest::default()),
        LocalInvoker::new(server, |s, req| async move { s.list_employees(req).await }),
    )?;

    Ok(())
}

/// Dial `endpoint` and register the employee routes over the resulting
/// channel. Connect failure is fatal for gateway startup.
pub async fn register_from_endpoint(
    gateway: &mut Gateway,
    endpoint: &str,
) -> Result<Channel, GatewayError> {
    let endpoint = Endpoint::from_shared(endpoint.to_string())
        .map_err(|e| GatewayError::Config(format!("invalid backend endpoint: {e}")))?;
    let channel = endpoint.connect().await.map_err(GatewayError::Connect)?;
    register_client(gateway, channel.clone())?;
    Ok(channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use employees_service::EmployeeDirectory;
    use http::Uri;
    use http_body_util::BodyExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_employee_binds_short_name() {
        let mut gateway = Gateway::new();
        register_server(&mut gateway, Arc::new(EmployeeDirectory::with_sample_data())).unwrap();

        let (_, binding) = gateway
            .resolve(&Method::GET, "/employees/v1/get_employee/Tom")
            .unwrap();
        assert_eq!(binding.get("short_name"), Some("Tom"));
    }

    #[tokio::test]
    async fn list_employees_binds_empty_and_uses_zero_request() {
        let mut gateway = Gateway::new();
        register_server(&mut gateway, Arc::new(EmployeeDirectory::with_sample_data())).unwrap();

        let (_, binding) = gateway
            .resolve(&Method::GET, "/employees/v1/list_employees")
            .unwrap();
        assert!(binding.is_empty());

        let uri: Uri = "/employees/v1/list_employees".parse().unwrap();
        let response = gateway.handle(&Method::GET, &uri, Bytes::new()).await;
        let json = body_json(response).await;
        assert_eq!(
            json["short_names"],
            serde_json::json!(["Michelle", "Sabrina", "Tom"])
        );
    }

    #[tokio::test]
    async fn unknown_employee_is_404() {
        let mut gateway = Gateway::new();
        register_server(&mut gateway, Arc::new(EmployeeDirectory::with_sample_data())).unwrap();

        let uri: Uri = "/employees/v1/get_employee/Zzz".parse().unwrap();
        let response = gateway.handle(&Method::GET, &uri, Bytes::new()).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "not_found");
        assert!(json["message"].as_str().unwrap().contains("Zzz"));
    }
}
