//! Pay period model.
//!
//! Payroll is processed once per calendar month. [`PayPeriod`] identifies
//! that month and is one third of the key that makes a payroll record unique.

use std::fmt;

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A monthly pay period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
///
/// let period = PayPeriod::new(1, 2025).unwrap();
/// assert_eq!(period.month_name(), "January");
/// assert_eq!(period.to_string(), "January 2025");
/// assert!(PayPeriod::new(13, 2025).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 (January) to 12 (December).
    pub month: u32,
}

impl PayPeriod {
    /// Creates a pay period, rejecting months outside 1..=12.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        let period = Self { year, month };
        period.validate()?;
        Ok(period)
    }

    /// Checks that the period names a real month.
    ///
    /// Periods built through serde bypass [`PayPeriod::new`], so callers at
    /// the boundary re-check them here.
    pub fn validate(&self) -> EngineResult<()> {
        self.first_day().map(|_| ())
    }

    /// Returns the English name of the month (e.g. "January").
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }

    /// Returns the first calendar day of the period.
    ///
    /// Used to pick the rate table in effect for the period.
    pub fn first_day(&self) -> EngineResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(EngineError::InvalidPeriod {
            month: self.month,
            year: self.year,
        })
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}
