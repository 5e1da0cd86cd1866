//! Rate table types for statutory payroll.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML rate files. A [`RateTable`] is an immutable
//! value: calculations receive it explicitly and never read shared state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Legally defined standard working time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingTime {
    /// Standard monthly hours; divides the monthly salary into an hourly rate.
    pub monthly_hours: Decimal,
    /// Standard daily hours; converts absence days into hours.
    pub daily_hours: Decimal,
}

/// The income base a pension contribution is levied on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionBase {
    /// Gross salary (base plus overtime less attendance).
    #[default]
    Gross,
    /// Basic monthly salary only.
    BasicSalary,
}

/// Pension contribution rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionRates {
    /// Employee share, as a fraction of pensionable pay.
    pub employee: Decimal,
    /// Employer share, as a fraction of pensionable pay.
    pub employer: Decimal,
    /// Which income counts as pensionable pay.
    #[serde(default)]
    pub base: ContributionBase,
}

/// An employee/employer split of a flat contribution rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSplit {
    /// Employee share, as a fraction of gross salary.
    pub employee: Decimal,
    /// Employer share, as a fraction of gross salary.
    pub employer: Decimal,
}

/// The two rates of a threshold-switched levy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteppedRate {
    /// Applied to the whole amount when income is at or below the threshold.
    pub lower: Decimal,
    /// Applied to the whole amount when income is above the threshold.
    pub higher: Decimal,
}

/// Social contribution levy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContributionRates {
    /// Monthly income at which the higher rates start to apply.
    pub threshold: Decimal,
    /// Employee rates.
    pub employee: SteppedRate,
    /// Employer rates.
    pub employer: SteppedRate,
}

/// Overtime multipliers applied to the hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeMultipliers {
    /// Weekday overtime.
    pub weekday: Decimal,
    /// Sunday and public-holiday overtime, standard rate.
    pub sunday: Decimal,
    /// Sunday and public-holiday overtime, premium rate.
    pub sunday_premium: Decimal,
}

/// One income tax bracket.
///
/// `max` of `None` means the bracket has no upper limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the bracket (inclusive).
    pub min: Decimal,
    /// Upper bound of the bracket, or `None` if unbounded.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// Marginal rate applied to income inside the bracket.
    pub rate: Decimal,
}

impl TaxBracket {
    /// Returns the part of `income` that falls inside this bracket.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::TaxBracket;
    /// use rust_decimal::Decimal;
    ///
    /// let bracket = TaxBracket {
    ///     min: Decimal::new(10000, 0),
    ///     max: Some(Decimal::new(20000, 0)),
    ///     rate: Decimal::new(10, 2),
    /// };
    /// assert_eq!(bracket.portion_of(Decimal::new(15000, 0)), Decimal::new(5000, 0));
    /// assert_eq!(bracket.portion_of(Decimal::new(25000, 0)), Decimal::new(10000, 0));
    /// assert_eq!(bracket.portion_of(Decimal::new(5000, 0)), Decimal::ZERO);
    /// ```
    pub fn portion_of(&self, income: Decimal) -> Decimal {
        if income <= self.min {
            return Decimal::ZERO;
        }
        let upper = match self.max {
            Some(max) if max < income => max,
            _ => income,
        };
        upper - self.min
    }
}

/// The complete statutory rate table used to compute payroll.
///
/// Created and edited by an administrator; read-only at calculation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Identifier stamped onto every record computed with this table.
    pub version: String,
    /// First date the table applies to.
    pub effective_from: NaiveDate,
    /// Jurisdiction display name.
    #[serde(default)]
    pub jurisdiction: String,
    /// Standard working time.
    pub working_time: WorkingTime,
    /// Pension contribution rates.
    pub pension: PensionRates,
    /// Savings fund contribution rates.
    pub savings_fund: ContributionSplit,
    /// Social contribution levy.
    pub social_contribution: SocialContributionRates,
    /// Training levy, flat fraction of gross salary.
    pub training_levy: Decimal,
    /// Guarantee fund employee rate, flat fraction of gross salary.
    pub guarantee_fund: Decimal,
    /// Overtime multipliers.
    pub overtime: OvertimeMultipliers,
    /// Income tax brackets, ascending and contiguous.
    pub tax_brackets: Vec<TaxBracket>,
}
