//! Outcome of a batch payroll run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PayPeriod, PayrollRecord};

/// An employee the run could not pay, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFailure {
    /// The employee that failed.
    pub employee_id: String,
    /// The field at fault, when one can be named.
    pub field: Option<String>,
    /// Why the employee was skipped.
    pub reason: String,
}

/// The result of processing payroll for a set of employees.
///
/// A run partially succeeds: per-employee input problems land in
/// `failures` while every other employee still gets a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunReport {
    /// The month processed.
    pub period: PayPeriod,
    /// Version of the rate table used for every record.
    pub rate_table_version: String,
    /// Records produced and committed.
    pub records: Vec<PayrollRecord>,
    /// Employees skipped, with reasons.
    pub failures: Vec<EmployeeFailure>,
}

impl PayrollRunReport {
    /// Number of employees paid.
    pub fn processed_count(&self) -> usize {
        self.records.len()
    }

    /// Number of employees skipped.
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Ids of records carrying a review flag.
    pub fn flagged_record_ids(&self) -> Vec<Uuid> {
        self.records
            .iter()
            .filter(|r| r.requires_review())
            .map(|r| r.id)
            .collect()
    }

    /// One-line summary, e.g. "January 2025: 4 processed, 1 failed".
    pub fn summary(&self) -> String {
        format!(
            "{}: {} processed, {} failed",
            self.period,
            self.processed_count(),
            self.failed_count()
        )
    }
}
