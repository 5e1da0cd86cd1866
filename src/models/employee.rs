//! Employee model and related types.
//!
//! This module defines the Employee struct and EmploymentStatus enum
//! for representing salaried workers in the payroll engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the employment status of an employee.
///
/// Only [`EmploymentStatus::Active`] employees are processed by a payroll run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Currently employed and paid through payroll.
    #[default]
    Active,
    /// Temporarily off payroll (e.g. unpaid leave).
    Inactive,
    /// Employment has ended.
    Terminated,
}

impl EmploymentStatus {
    /// Returns the status as its serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "active",
            EmploymentStatus::Inactive => "inactive",
            EmploymentStatus::Terminated => "terminated",
        }
    }
}

/// Represents an employee paid a fixed monthly salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    #[serde(default)]
    pub name: String,
    /// Monthly base salary in the jurisdiction's currency.
    pub base_salary: Decimal,
    /// Current employment status.
    #[serde(default)]
    pub status: EmploymentStatus,
}

impl Employee {
    /// Returns true if the employee should be included in a payroll run.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Employee, EmploymentStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Priya Ramdin".to_string(),
    ///     base_salary: Decimal::new(20000, 0),
    ///     status: EmploymentStatus::Active,
    /// };
    /// assert!(employee.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }
}
