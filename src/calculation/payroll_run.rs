//! Batch payroll runs.
//!
//! A run pays a set of employees for one month. Whole-run problems (a bad
//! rate table, a period already processed) abort before any employee is
//! computed; per-employee input problems are collected in the report while
//! the rest of the batch proceeds.
//!
//! A month may be paid in more than one run. Each record is unique per
//! employee and period, so a later run for the same month may pay employees
//! the earlier runs did not cover (new joiners, or employees whose input
//! failed and was corrected). A run that includes anyone already paid for
//! the month is refused as a whole.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::RateTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeFailure, EmployeePayrollInput, PayPeriod, PayrollRunReport};
use crate::store::PayrollStore;

use super::payroll::calculate_payroll;

/// Processes payroll for `inputs` in `period` and commits the records.
///
/// # Errors
///
/// - [`EngineError::InvalidRateTable`] if `rates` is malformed
/// - [`EngineError::InvalidPeriod`] if the period is not a real month
/// - [`EngineError::DuplicatePeriod`] if any submitted employee already has
///   a record for the period, checked before computing and again at commit
///
/// Employees already paid for the period by an earlier run are the only
/// conflict; employees the earlier runs left out can be paid now.
///
/// When an employee appears more than once in `inputs`, the first entry that
/// calculates successfully is paid. Entries before it that fail are reported
/// as ordinary failures, and entries after it are reported against the
/// `employee.id` field.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::run_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{EmployeePayrollInput, Employee, EmploymentStatus, PayPeriod};
/// use payroll_engine::store::InMemoryPayrollStore;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/mauritius").unwrap();
/// let period = PayPeriod::new(9, 2025).unwrap();
/// let rates = loader.rate_table_for(period).unwrap();
/// let store = InMemoryPayrollStore::new();
///
/// let inputs = vec![EmployeePayrollInput {
///     employee: Employee {
///         id: "emp_001".to_string(),
///         name: "Priya Ramdin".to_string(),
///         base_salary: Decimal::new(20000, 0),
///         status: EmploymentStatus::Active,
///     },
///     overtime: Default::default(),
///     attendance: Default::default(),
/// }];
///
/// let report = run_payroll(&store, &inputs, period, &rates, Utc::now()).unwrap();
/// assert_eq!(report.processed_count(), 1);
///
/// // The same period cannot be processed twice.
/// assert!(run_payroll(&store, &inputs, period, &rates, Utc::now()).is_err());
/// ```
pub fn run_payroll<S: PayrollStore + ?Sized>(
    store: &S,
    inputs: &[EmployeePayrollInput],
    period: PayPeriod,
    rates: &RateTable,
    created_at: DateTime<Utc>,
) -> EngineResult<PayrollRunReport> {
    rates.validate()?;
    period.validate()?;

    let employee_ids: Vec<String> = inputs.iter().map(|i| i.employee.id.clone()).collect();
    let existing = store.existing_employee_ids(period, &employee_ids)?;
    if !existing.is_empty() {
        warn!(
            period = %period,
            employees = ?existing,
            "Refusing to reprocess payroll period"
        );
        return Err(EngineError::DuplicatePeriod {
            period: period.to_string(),
            employee_ids: existing,
        });
    }

    let mut records = Vec::with_capacity(inputs.len());
    let mut failures = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(inputs.len());

    for input in inputs {
        let employee_id = input.employee.id.as_str();

        if seen.contains(employee_id) {
            failures.push(EmployeeFailure {
                employee_id: employee_id.to_string(),
                field: Some("employee.id".to_string()),
                reason: "employee already paid earlier in this run".to_string(),
            });
            continue;
        }

        match calculate_payroll(
            &input.employee,
            &input.overtime,
            &input.attendance,
            period,
            rates,
            created_at,
        ) {
            Ok(record) => {
                if record.has_negative_net_pay() {
                    warn!(
                        employee_id = %employee_id,
                        net = %record.net_salary,
                        "Negative net pay; record flagged for review"
                    );
                }
                seen.insert(employee_id);
                records.push(record);
            }
            Err(EngineError::InvalidInput { field, message, .. }) => {
                warn!(
                    employee_id = %employee_id,
                    field = %field,
                    reason = %message,
                    "Skipping employee"
                );
                failures.push(EmployeeFailure {
                    employee_id: employee_id.to_string(),
                    field: Some(field),
                    reason: message,
                });
            }
            Err(err) => return Err(err),
        }
    }

    store.commit_run(period, &records)?;

    let report = PayrollRunReport {
        period,
        rate_table_version: rates.version.clone(),
        records,
        failures,
    };

    info!(
        period = %period,
        rate_table_version = %report.rate_table_version,
        processed = report.processed_count(),
        failed = report.failed_count(),
        "Payroll run completed"
    );

    Ok(report)
}
