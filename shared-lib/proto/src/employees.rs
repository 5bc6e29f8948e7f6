//! `employees.v1.EmployeesService` messages and server trait.

use serde::{Deserialize, Serialize};
use tonic::{Request, Response, Status};

/// Full gRPC method path for `GetEmployee`.
pub const GET_EMPLOYEE_METHOD: &str = "/employees.v1.EmployeesService/GetEmployee";
/// Full gRPC method path for `ListEmployees`.
pub const LIST_EMPLOYEES_METHOD: &str = "/employees.v1.EmployeesService/ListEmployees";

/// A single employee record.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    #[prost(string, tag = "1")]
    pub full_name: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
    #[prost(string, tag = "3")]
    pub birthday: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct GetEmployeeRequest {
    /// Short, "friendly" name the record is keyed by
    #[prost(string, tag = "1")]
    pub short_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct GetEmployeeResponse {
    #[prost(message, optional, tag = "1")]
    pub employee: ::core::option::Option<Employee>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ListEmployeesRequest {}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ListEmployeesResponse {
    #[prost(string, repeated, tag = "1")]
    pub short_names: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

/// Server-side contract for the employees service.
///
/// Implementations are called directly for in-process invocation and
/// can equally back a hosted gRPC server.
#[tonic::async_trait]
pub trait EmployeesService: Send + Sync + 'static {
    async fn get_employee(
        &self,
        request: Request<GetEmployeeRequest>,
    ) -> Result<Response<GetEmployeeResponse>, Status>;

    async fn list_employees(
        &self,
        request: Request<ListEmployeesRequest>,
    ) -> Result<Response<ListEmployeesResponse>, Status>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_json_shape() {
        let resp = GetEmployeeResponse {
            employee: Some(Employee {
                full_name: "Thomas Anderson".to_string(),
                id: 1,
                birthday: "1999-03-31".to_string(),
            }),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["employee"]["full_name"], "Thomas Anderson");
        assert_eq!(json["employee"]["id"], 1);
    }

    #[test]
    fn zero_value_request_is_empty() {
        let req = ListEmployeesRequest::default();
        assert_eq!(req, ListEmployeesRequest {});
    }
}
