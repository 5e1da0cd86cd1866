//! In-memory payroll record store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, PayrollKey, PayrollRecord};

use super::PayrollStore;

/// A [`PayrollStore`] backed by a mutex-guarded map.
///
/// The single lock serializes check-then-write for every period.
#[derive(Debug, Default)]
pub struct InMemoryPayrollStore {
    records: Mutex<HashMap<PayrollKey, PayrollRecord>>,
}

impl InMemoryPayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PayrollKey, PayrollRecord>> {
        // Inserts only follow a passed duplicate check, so a poisoned map is still whole.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn conflicts<'a>(
    records: &HashMap<PayrollKey, PayrollRecord>,
    period: PayPeriod,
    employee_ids: impl Iterator<Item = &'a String>,
) -> Vec<String> {
    let mut found: Vec<String> = employee_ids
        .filter(|id| records.contains_key(&PayrollKey::new(id.as_str(), period)))
        .cloned()
        .collect();
    found.sort();
    found.dedup();
    found
}

impl PayrollStore for InMemoryPayrollStore {
    fn existing_employee_ids(
        &self,
        period: PayPeriod,
        employee_ids: &[String],
    ) -> EngineResult<Vec<String>> {
        let records = self.lock();
        Ok(conflicts(&records, period, employee_ids.iter()))
    }

    fn commit_run(&self, period: PayPeriod, records: &[PayrollRecord]) -> EngineResult<()> {
        let mut stored = self.lock();

        let duplicates = conflicts(&stored, period, records.iter().map(|r| &r.employee_id));
        if !duplicates.is_empty() {
            return Err(EngineError::DuplicatePeriod {
                period: period.to_string(),
                employee_ids: duplicates,
            });
        }

        for record in records {
            stored.insert(record.key(), record.clone());
        }

        info!(period = %period, records = records.len(), "Committed payroll run");
        Ok(())
    }

    fn records_for(&self, period: PayPeriod) -> EngineResult<Vec<PayrollRecord>> {
        let stored = self.lock();
        let mut records: Vec<PayrollRecord> = stored
            .values()
            .filter(|r| r.period == period)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(records)
    }
}
