//! Shared RPC definitions for all services.
//!
//! The message structs carry hand-rolled prost field tags so the wire
//! encoding matches the `employees/v1/employees.proto` schema without a
//! protoc step, plus serde derives for the gateway's JSON rendering.

/// Employees service definitions (`employees.v1`)
pub mod employees;

pub use employees::*;
