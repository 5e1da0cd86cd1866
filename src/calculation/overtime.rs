//! Overtime pay calculation.
//!
//! Overtime is paid in three independent categories, each priced at the
//! hourly rate times its own multiplier:
//! - weekday overtime
//! - Sunday / public-holiday overtime at the standard rate
//! - Sunday / public-holiday overtime at the premium rate
//!
//! There is no cap and no interaction between categories.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{checked_sum, in_range};
use crate::config::OvertimeMultipliers;
use crate::error::EngineResult;
use crate::models::{AuditStep, OvertimeBreakdown, OvertimeCategory, OvertimeInput, OvertimeLine};

/// The result of overtime calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeResult {
    /// One line per category (zero-hour categories yield zero lines).
    pub breakdown: OvertimeBreakdown,
    /// Total overtime hours.
    pub total_hours: Decimal,
    /// Total overtime pay.
    pub total_amount: Decimal,
    /// Audit steps, one for each category with hours worked.
    pub audit_steps: Vec<AuditStep>,
}

fn category_label(category: OvertimeCategory) -> (&'static str, &'static str) {
    match category {
        OvertimeCategory::Weekday => ("overtime_weekday", "Weekday Overtime"),
        OvertimeCategory::Sunday => ("overtime_sunday", "Sunday Overtime"),
        OvertimeCategory::SundayPremium => ("overtime_sunday_premium", "Sunday Premium Overtime"),
    }
}

fn price_line(
    category: OvertimeCategory,
    hours: Decimal,
    hourly_rate: Decimal,
    multiplier: Decimal,
    field: &str,
) -> EngineResult<OvertimeLine> {
    let rate = in_range(hourly_rate.checked_mul(multiplier), "base_salary")?;
    Ok(OvertimeLine {
        category,
        hours,
        multiplier,
        rate,
        amount: in_range(hours.checked_mul(rate), field)?,
    })
}

fn audit_line(line: &OvertimeLine, hourly_rate: Decimal, step_number: u32) -> AuditStep {
    let (rule_id, rule_name) = category_label(line.category);
    AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "hours": line.hours.normalize().to_string(),
            "hourly_rate": hourly_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "multiplier": line.multiplier.normalize().to_string(),
            "rate": line.rate.normalize().to_string(),
            "amount": line.amount.normalize().to_string()
        }),
        reasoning: format!(
            "{} hours × ${} × {} = ${}",
            line.hours.normalize(),
            hourly_rate.normalize(),
            line.multiplier.normalize(),
            line.amount.normalize()
        ),
    }
}

/// Calculates overtime pay for a period.
///
/// # Arguments
///
/// * `overtime` - Hours worked per category (assumed non-negative)
/// * `hourly_rate` - The employee's derived hourly rate
/// * `multipliers` - The rate table's overtime multipliers
/// * `step_number_start` - The starting step number for audit trail sequencing
///
/// # Errors
///
/// Returns [`crate::error::EngineError::AmountOverflow`] naming the hours
/// field whose pay, or whose total, does not fit in a decimal.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_overtime;
/// use payroll_engine::config::OvertimeMultipliers;
/// use payroll_engine::models::OvertimeInput;
/// use rust_decimal::Decimal;
///
/// let multipliers = OvertimeMultipliers {
///     weekday: Decimal::new(15, 1),
///     sunday: Decimal::new(2, 0),
///     sunday_premium: Decimal::new(3, 0),
/// };
/// let overtime = OvertimeInput {
///     weekday_hours: Decimal::new(10, 0),
///     ..Default::default()
/// };
///
/// let result = calculate_overtime(&overtime, Decimal::new(100, 0), &multipliers, 1).unwrap();
/// assert_eq!(result.total_amount, Decimal::new(1500, 0));
/// assert_eq!(result.breakdown.sunday.amount, Decimal::ZERO);
/// ```
pub fn calculate_overtime(
    overtime: &OvertimeInput,
    hourly_rate: Decimal,
    multipliers: &OvertimeMultipliers,
    step_number_start: u32,
) -> EngineResult<OvertimeResult> {
    let breakdown = OvertimeBreakdown {
        weekday: price_line(
            OvertimeCategory::Weekday,
            overtime.weekday_hours,
            hourly_rate,
            multipliers.weekday,
            "overtime.weekday_hours",
        )?,
        sunday: price_line(
            OvertimeCategory::Sunday,
            overtime.sunday_hours,
            hourly_rate,
            multipliers.sunday,
            "overtime.sunday_hours",
        )?,
        sunday_premium: price_line(
            OvertimeCategory::SundayPremium,
            overtime.sunday_premium_hours,
            hourly_rate,
            multipliers.sunday_premium,
            "overtime.sunday_premium_hours",
        )?,
    };

    let mut audit_steps = Vec::new();
    let mut step_number = step_number_start;
    for line in breakdown.lines() {
        if line.hours > Decimal::ZERO {
            audit_steps.push(audit_line(line, hourly_rate, step_number));
            step_number += 1;
        }
    }

    Ok(OvertimeResult {
        total_hours: checked_sum(breakdown.lines().map(|l| l.hours), "overtime")?,
        total_amount: checked_sum(breakdown.lines().map(|l| l.amount), "overtime")?,
        breakdown,
        audit_steps,
    })
}
