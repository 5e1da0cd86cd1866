//! Persistence seam for payroll records.
//!
//! The engine itself never stores anything. A payroll run commits its batch
//! through [`PayrollStore`], whose `commit_run` must check for existing
//! records and write the new ones as one atomic step, so two runs racing on
//! the same period cannot both succeed.

mod memory;

pub use memory::InMemoryPayrollStore;

use crate::error::EngineResult;
use crate::models::{PayPeriod, PayrollRecord};

/// Storage for committed payroll records.
pub trait PayrollStore: Send + Sync {
    /// Returns which of `employee_ids` already hold a record for `period`.
    fn existing_employee_ids(
        &self,
        period: PayPeriod,
        employee_ids: &[String],
    ) -> EngineResult<Vec<String>>;

    /// Atomically writes `records` for `period`.
    ///
    /// Fails with [`crate::error::EngineError::DuplicatePeriod`], writing
    /// nothing, if any record's employee already has one for the period.
    fn commit_run(&self, period: PayPeriod, records: &[PayrollRecord]) -> EngineResult<()>;

    /// Returns every record stored for `period`, ordered by employee id.
    fn records_for(&self, period: PayPeriod) -> EngineResult<Vec<PayrollRecord>>;
}
