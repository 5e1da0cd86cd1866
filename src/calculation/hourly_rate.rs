//! Hourly rate derivation.
//!
//! Overtime and attendance are both priced off an hourly rate derived from
//! the monthly salary and the legally defined standard monthly hours.

use rust_decimal::Decimal;

use crate::config::WorkingTime;
use crate::error::EngineResult;
use crate::models::AuditStep;

use super::in_range;

/// The result of deriving an hourly rate, including the audit step.
#[derive(Debug, Clone)]
pub struct HourlyRateResult {
    /// The derived hourly rate.
    pub hourly_rate: Decimal,
    /// The value of one standard working day.
    pub daily_rate: Decimal,
    /// The audit step recording the derivation.
    pub audit_step: AuditStep,
}

/// Derives the hourly rate from a monthly base salary.
///
/// `hourly_rate = base_salary / monthly_hours`; the daily rate is the hourly
/// rate times the standard daily hours. `working_time` must come from a
/// validated rate table (both divisors positive).
///
/// # Errors
///
/// Returns [`crate::error::EngineError::AmountOverflow`] if the salary is too
/// large for the derived rates to be represented.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::derive_hourly_rate;
/// use payroll_engine::config::WorkingTime;
/// use rust_decimal::Decimal;
///
/// let working_time = WorkingTime {
///     monthly_hours: Decimal::new(200, 0),
///     daily_hours: Decimal::new(8, 0),
/// };
/// let result = derive_hourly_rate(Decimal::new(20000, 0), &working_time, 1).unwrap();
///
/// assert_eq!(result.hourly_rate, Decimal::new(100, 0));
/// assert_eq!(result.daily_rate, Decimal::new(800, 0));
/// ```
pub fn derive_hourly_rate(
    base_salary: Decimal,
    working_time: &WorkingTime,
    step_number: u32,
) -> EngineResult<HourlyRateResult> {
    let hourly_rate = in_range(
        base_salary.checked_div(working_time.monthly_hours),
        "base_salary",
    )?;
    let daily_rate = in_range(
        hourly_rate.checked_mul(working_time.daily_hours),
        "base_salary",
    )?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "hourly_rate".to_string(),
        rule_name: "Hourly Rate Derivation".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "monthly_hours": working_time.monthly_hours.normalize().to_string(),
            "daily_hours": working_time.daily_hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "hourly_rate": hourly_rate.normalize().to_string(),
            "daily_rate": daily_rate.normalize().to_string()
        }),
        reasoning: format!(
            "${} / {} standard monthly hours = ${} per hour",
            base_salary.normalize(),
            working_time.monthly_hours.normalize(),
            hourly_rate.normalize()
        ),
    };

    Ok(HourlyRateResult {
        hourly_rate,
        daily_rate,
        audit_step,
    })
}
