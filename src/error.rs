//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while configuring rates,
//! calculating payroll and committing payroll runs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single problem found while validating a rate table.
///
/// Validation collects every violation rather than stopping at the first,
/// so an administrator can fix a broken table in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateViolation {
    /// Dotted path of the offending field (e.g. `tax_brackets[1].min`).
    pub field: String,
    /// What is wrong with the field.
    pub message: String,
}

impl RateViolation {
    /// Creates a new violation for the given field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_violations(violations: &[RateViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rates".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rates");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The rate table is malformed. Blocks every calculation that uses it.
    #[error("Invalid rate table ({} violation(s)): {}", .violations.len(), join_violations(.violations))]
    InvalidRateTable {
        /// Every violation found in the table.
        violations: Vec<RateViolation>,
    },

    /// No rate table is in effect for the requested period.
    #[error("No rate table in effect for {period}")]
    RateTableNotFound {
        /// The period that was requested.
        period: String,
    },

    /// The requested pay period does not exist.
    #[error("Invalid pay period: month {month} of {year}")]
    InvalidPeriod {
        /// The month number supplied.
        month: u32,
        /// The year supplied.
        year: i32,
    },

    /// Input for a single employee was rejected.
    #[error("Invalid input for employee '{employee_id}', field '{field}': {message}")]
    InvalidInput {
        /// The employee whose input was rejected.
        employee_id: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An intermediate amount exceeded the decimal range.
    ///
    /// Raised by the calculation steps; [`EngineError::for_employee`] turns
    /// it into [`EngineError::InvalidInput`] once the employee is known.
    #[error("Amount out of range while computing {field}")]
    AmountOverflow {
        /// The input field that drove the amount out of range.
        field: String,
    },

    /// Payroll has already been processed for the period.
    #[error("Payroll for {period} already processed for employee(s): {}", .employee_ids.join(", "))]
    DuplicatePeriod {
        /// The period that was already processed.
        period: String,
        /// The employees that already hold a record for the period.
        employee_ids: Vec<String>,
    },
}

impl EngineError {
    /// Returns true when the error concerns a single employee and a batch
    /// run should record it and carry on with the others.
    pub fn is_per_employee(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput { .. } | EngineError::AmountOverflow { .. }
        )
    }

    /// Attributes an out-of-range amount to the employee whose input caused it.
    ///
    /// Every other error is returned unchanged.
    pub fn for_employee(self, employee_id: &str) -> EngineError {
        match self {
            EngineError::AmountOverflow { field } => EngineError::InvalidInput {
                employee_id: employee_id.to_string(),
                field,
                message: "amount out of range".to_string(),
            },
            other => other,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
