//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod inputs;
mod pay_period;
mod payroll_record;
mod run_report;

pub use employee::{Employee, EmploymentStatus};
pub use inputs::{AttendanceInput, EmployeePayrollInput, OvertimeInput};
pub use pay_period::PayPeriod;
pub use payroll_record::{
    AttendanceDeduction, AuditStep, AuditTrace, AuditWarning, EmployerContributions,
    OvertimeBreakdown, OvertimeCategory, OvertimeLine, PayrollFlag, PayrollKey, PayrollRecord,
    StatutoryDeductions,
};
pub use run_report::{EmployeeFailure, PayrollRunReport};
