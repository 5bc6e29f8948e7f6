//! Employees Service
//!
//! This crate provides the employee lookup backend. The gateway calls
//! it either in-process (direct trait call) or remotely when it is
//! hosted behind a gRPC server.

pub mod directory;
pub mod service;

pub use directory::{EmployeeDirectory, EmployeeRecord};
