//! Rate table loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory rate
//! tables from YAML files and selecting the one in effect for a pay period.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult, RateViolation};
use crate::models::PayPeriod;

use super::types::RateTable;

/// Loads and provides access to every known rate table.
///
/// Tables are kept sorted by effective date and handed out as
/// `Arc<RateTable>` snapshots, so a table saved later never alters one a
/// calculation is already using.
///
/// # Directory Structure
///
/// ```text
/// config/mauritius/
/// └── rates/
///     ├── 2024-07-01.yaml  # Rates effective from this date
///     └── 2025-07-01.yaml
/// ```
///
/// # Example
///
/// ```
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::PayPeriod;
///
/// let loader = ConfigLoader::load("./config/mauritius").unwrap();
///
/// let period = PayPeriod::new(1, 2025).unwrap();
/// let table = loader.rate_table_for(period).unwrap();
/// assert_eq!(table.version, "2024-07");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    tables: Vec<Arc<RateTable>>,
}

impl ConfigLoader {
    /// Loads every rate table under `path/rates`.
    ///
    /// Returns an error if:
    /// - the rates directory is missing or holds no `.yaml` files
    /// - any file contains invalid YAML or misses a required field
    /// - any table fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let rates_dir = path.as_ref().join("rates");
        let tables = Self::load_rates(&rates_dir)?;
        let loader = Self::from_tables(tables)?;

        info!(
            path = %rates_dir.display(),
            tables = loader.tables.len(),
            "Loaded rate tables"
        );
        Ok(loader)
    }

    /// Builds a loader from tables already in memory, validating each.
    pub fn from_tables(tables: Vec<RateTable>) -> EngineResult<Self> {
        let mut loader = Self::default();
        for table in tables {
            loader.publish(table)?;
        }
        Ok(loader)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<RateTable>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                debug!(path = %path.display(), "Reading rate table");
                tables.push(Self::load_yaml::<RateTable>(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(tables)
    }

    /// Validates a table and adds it to the history.
    ///
    /// This is the administrator's save path: an invalid table is rejected
    /// with every violation and the existing history is left untouched.
    /// Versions are immutable because records name the version they were
    /// computed with. Saving an existing version succeeds only when the table
    /// is identical, and returns the stored snapshot.
    pub fn publish(&mut self, table: RateTable) -> EngineResult<Arc<RateTable>> {
        table.validate()?;

        if let Some(existing) = self.by_version(&table.version) {
            if *existing == table {
                return Ok(existing);
            }
            return Err(EngineError::InvalidRateTable {
                violations: vec![RateViolation::new(
                    "version",
                    format!(
                        "version {} already exists; publish a new version",
                        table.version
                    ),
                )],
            });
        }

        let table = Arc::new(table);
        self.tables.push(Arc::clone(&table));
        self.tables
            .sort_by(|a, b| a.effective_from.cmp(&b.effective_from));
        info!(
            version = %table.version,
            effective_from = %table.effective_from,
            "Published rate table"
        );
        Ok(table)
    }

    /// Returns all tables, oldest first.
    pub fn tables(&self) -> &[Arc<RateTable>] {
        &self.tables
    }

    /// Returns the table with the latest effective date.
    pub fn current(&self) -> Option<Arc<RateTable>> {
        self.tables.last().cloned()
    }

    /// Finds a table by version.
    pub fn by_version(&self, version: &str) -> Option<Arc<RateTable>> {
        self.tables.iter().find(|t| t.version == version).cloned()
    }

    /// Returns the table in effect on the first day of the period.
    ///
    /// Recomputing a past month therefore uses the rates of that month, not
    /// today's.
    pub fn rate_table_for(&self, period: PayPeriod) -> EngineResult<Arc<RateTable>> {
        let first_day = period.first_day()?;

        self.tables
            .iter()
            .rev()
            .find(|t| t.effective_from <= first_day)
            .cloned()
            .ok_or_else(|| EngineError::RateTableNotFound {
                period: period.to_string(),
            })
    }
}
