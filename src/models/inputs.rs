//! Per-period inputs supplied alongside each employee.
//!
//! Overtime and attendance figures are captured fresh for every payroll run.
//! All quantities must be non-negative; [`OvertimeInput::validate`] and
//! [`AttendanceInput::validate`] reject anything else.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Employee;

fn ensure_non_negative(employee_id: &str, field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            employee_id: employee_id.to_string(),
            field: field.to_string(),
            message: format!("must not be negative (got {})", value.normalize()),
        });
    }
    Ok(())
}

/// Overtime hours worked during a pay period, by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeInput {
    /// Overtime hours worked on weekdays.
    #[serde(default)]
    pub weekday_hours: Decimal,
    /// Sunday or public-holiday overtime at the standard Sunday rate.
    #[serde(default)]
    pub sunday_hours: Decimal,
    /// Sunday or public-holiday overtime at the premium rate.
    #[serde(default)]
    pub sunday_premium_hours: Decimal,
}

impl OvertimeInput {
    /// Rejects negative hours in any category.
    pub fn validate(&self, employee_id: &str) -> EngineResult<()> {
        ensure_non_negative(employee_id, "overtime.weekday_hours", self.weekday_hours)?;
        ensure_non_negative(employee_id, "overtime.sunday_hours", self.sunday_hours)?;
        ensure_non_negative(
            employee_id,
            "overtime.sunday_premium_hours",
            self.sunday_premium_hours,
        )
    }

    /// Total overtime hours across all categories.
    pub fn total_hours(&self) -> Decimal {
        self.weekday_hours + self.sunday_hours + self.sunday_premium_hours
    }
}

/// Attendance shortfalls during a pay period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceInput {
    /// Whole or partial days of unpaid absence.
    #[serde(default)]
    pub absence_days: Decimal,
    /// Hours lost to late arrival.
    #[serde(default)]
    pub lateness_hours: Decimal,
    /// Hours lost to leaving early.
    #[serde(default)]
    pub early_departure_hours: Decimal,
}

impl AttendanceInput {
    /// Rejects negative days or hours.
    pub fn validate(&self, employee_id: &str) -> EngineResult<()> {
        ensure_non_negative(employee_id, "attendance.absence_days", self.absence_days)?;
        ensure_non_negative(employee_id, "attendance.lateness_hours", self.lateness_hours)?;
        ensure_non_negative(
            employee_id,
            "attendance.early_departure_hours",
            self.early_departure_hours,
        )
    }
}

/// Everything a payroll run needs to know about one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePayrollInput {
    /// The employee being paid.
    pub employee: Employee,
    /// Overtime worked in the period.
    #[serde(default)]
    pub overtime: OvertimeInput,
    /// Attendance shortfalls in the period.
    #[serde(default)]
    pub attendance: AttendanceInput,
}
