//! Calculation logic for the payroll engine.
//!
//! This module contains the calculation functions for monthly payroll:
//! hourly rate derivation, overtime by category, attendance deductions,
//! flat-rate statutory contributions, the threshold-switched social
//! contribution levy, marginal income tax, the single-employee
//! [`calculate_payroll`] that combines them, and batch [`run_payroll`].

mod attendance;
mod contributions;
mod hourly_rate;
mod income_tax;
mod overtime;
mod payroll;
mod payroll_run;
mod social_contribution;

pub use attendance::{AttendanceDeductionResult, calculate_attendance_deduction};
pub use contributions::{ContributionResult, FlatContribution, calculate_flat_contribution};
pub use hourly_rate::{HourlyRateResult, derive_hourly_rate};
pub use income_tax::{IncomeTaxResult, TaxSlice, calculate_income_tax};
pub use overtime::{OvertimeResult, calculate_overtime};
pub use payroll::calculate_payroll;
pub use payroll_run::run_payroll;
pub use social_contribution::{LevyBand, SocialContributionResult, calculate_social_contribution};

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Unwraps a checked decimal operation, blaming `field` on overflow.
fn in_range(value: Option<Decimal>, field: &str) -> EngineResult<Decimal> {
    value.ok_or_else(|| EngineError::AmountOverflow {
        field: field.to_string(),
    })
}

/// Sums `values`, blaming `field` on overflow.
fn checked_sum<I>(values: I, field: &str) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| in_range(acc.checked_add(v), field))
}
