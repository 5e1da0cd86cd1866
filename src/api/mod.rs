//! HTTP API for the payroll engine.
//!
//! This module provides the REST endpoints for previewing a calculation,
//! running and listing monthly payroll, and managing rate tables.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculatePayrollRequest, RunPayrollRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
