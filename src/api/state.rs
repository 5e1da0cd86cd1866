//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::{ConfigLoader, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::PayPeriod;
use crate::store::{InMemoryPayrollStore, PayrollStore};

/// Shared application state.
///
/// Holds the rate-table history and the payroll store. Lock guards are
/// released before any calculation runs; handlers work on `Arc` snapshots.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RwLock<ConfigLoader>>,
    store: Arc<dyn PayrollStore>,
}

impl AppState {
    /// Creates a new application state with the given rate tables and store.
    pub fn new(config: ConfigLoader, store: Arc<dyn PayrollStore>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            store,
        }
    }

    /// Creates application state backed by an empty in-memory store.
    pub fn in_memory(config: ConfigLoader) -> Self {
        Self::new(config, Arc::new(InMemoryPayrollStore::new()))
    }

    fn read(&self) -> RwLockReadGuard<'_, ConfigLoader> {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigLoader> {
        self.config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resolves the rate table for a calculation.
    ///
    /// A pinned `version` wins; otherwise the table in effect for `period`.
    pub fn rate_table(
        &self,
        version: Option<&str>,
        period: PayPeriod,
    ) -> EngineResult<Arc<RateTable>> {
        let config = self.read();
        match version {
            Some(version) => config.by_version(version).ok_or_else(|| {
                EngineError::RateTableNotFound {
                    period: format!("{period} (version {version})"),
                }
            }),
            None => config.rate_table_for(period),
        }
    }

    /// The most recent rate table, if any is loaded.
    pub fn current_rates(&self) -> Option<Arc<RateTable>> {
        self.read().current()
    }

    /// Validates and saves a rate table under a new version.
    ///
    /// An existing version can only be saved again unchanged.
    pub fn save_rates(&self, table: RateTable) -> EngineResult<Arc<RateTable>> {
        self.write().publish(table)
    }

    /// Returns the payroll store.
    pub fn store(&self) -> &dyn PayrollStore {
        self.store.as_ref()
    }
}
