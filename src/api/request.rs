//! Request types for the payroll API.

use serde::{Deserialize, Serialize};

use crate::models::{AttendanceInput, Employee, EmployeePayrollInput, OvertimeInput, PayPeriod};

/// Request body for `POST /payroll/calculate`.
///
/// Computes a single record as a preview; nothing is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatePayrollRequest {
    /// The month to compute.
    pub period: PayPeriod,
    /// The employee to pay.
    pub employee: Employee,
    /// Overtime worked in the month.
    #[serde(default)]
    pub overtime: OvertimeInput,
    /// Absence, lateness and early departures in the month.
    #[serde(default)]
    pub attendance: AttendanceInput,
    /// Pins a rate-table version instead of the one in effect for the period.
    #[serde(default)]
    pub rate_table_version: Option<String>,
}

/// Request body for `POST /payroll/runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPayrollRequest {
    /// The month to process.
    pub period: PayPeriod,
    /// One entry per employee to pay.
    pub employees: Vec<EmployeePayrollInput>,
    /// Pins a rate-table version instead of the one in effect for the period.
    #[serde(default)]
    pub rate_table_version: Option<String>,
}
