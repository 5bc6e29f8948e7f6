//! RPC surface of the employee directory.

use proto::{
    Employee, EmployeesService, GetEmployeeRequest, GetEmployeeResponse, ListEmployeesRequest,
    ListEmployeesResponse,
};
use tonic::{Request, Response, Status};

use crate::directory::{EmployeeDirectory, EmployeeRecord};

impl EmployeeRecord {
    fn to_message(&self) -> Employee {
        Employee {
            full_name: self.full_name.clone(),
            id: self.id,
            birthday: self.birthday.clone(),
        }
    }
}

#[tonic::async_trait]
impl EmployeesService for EmployeeDirectory {
    /// Takes a short, "friendly" name of an employee and returns that
    /// employee's associated record.
    async fn get_employee(
        &self,
        request: Request<GetEmployeeRequest>,
    ) -> Result<Response<GetEmployeeResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(short_name = %req.short_name, "rpc call to 'GetEmployee'");

        match self.lookup(&req.short_name) {
            Some(record) => Ok(Response::new(GetEmployeeResponse {
                employee: Some(record.to_message()),
            })),
            None => Err(Status::not_found(format!(
                "no employee data available for provided name '{}'",
                req.short_name
            ))),
        }
    }

    /// Takes no special request information and returns a list of all
    /// employees' short names.
    async fn list_employees(
        &self,
        _request: Request<ListEmployeesRequest>,
    ) -> Result<Response<ListEmployeesResponse>, Status> {
        tracing::info!("rpc call to 'ListEmployees' (no request data)");

        Ok(Response::new(ListEmployeesResponse {
            short_names: self.short_names(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_known_employee() {
        let dir = EmployeeDirectory::with_sample_data();
        let resp = dir
            .get_employee(Request::new(GetEmployeeRequest {
                short_name: "Michelle".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(resp.employee.unwrap().full_name, "Michelle Yeoh");
    }

    #[tokio::test]
    async fn get_unknown_employee_is_not_found() {
        let dir = EmployeeDirectory::with_sample_data();
        let err = dir
            .get_employee(Request::new(GetEmployeeRequest {
                short_name: "Zzz".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::NotFound);
        assert!(err.message().contains("Zzz"));
    }

    #[tokio::test]
    async fn list_returns_sorted_names() {
        let dir = EmployeeDirectory::with_sample_data();
        let resp = dir
            .list_employees(Request::new(ListEmployeesRequest::default()))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(resp.short_names, vec!["Michelle", "Sabrina", "Tom"]);
    }
}
