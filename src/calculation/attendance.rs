//! Attendance deduction calculation.
//!
//! Absence days are priced at the standard daily hours times the hourly
//! rate; lateness and early departure are priced at the plain hourly rate.

use rust_decimal::Decimal;

use super::{checked_sum, in_range};
use crate::config::WorkingTime;
use crate::error::EngineResult;
use crate::models::{AttendanceDeduction, AttendanceInput, AuditStep};

/// The result of attendance deduction calculation.
#[derive(Debug, Clone)]
pub struct AttendanceDeductionResult {
    /// The itemized deduction.
    pub deduction: AttendanceDeduction,
    /// The audit step, present only when there is something to deduct.
    pub audit_step: Option<AuditStep>,
}

/// Calculates the pay withheld for absence, lateness and early departure.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::AmountOverflow`] when a deduction
/// does not fit in a decimal.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_attendance_deduction;
/// use payroll_engine::config::WorkingTime;
/// use payroll_engine::models::AttendanceInput;
/// use rust_decimal::Decimal;
///
/// let working_time = WorkingTime {
///     monthly_hours: Decimal::new(200, 0),
///     daily_hours: Decimal::new(8, 0),
/// };
/// let attendance = AttendanceInput {
///     absence_days: Decimal::new(2, 0),
///     lateness_hours: Decimal::new(3, 0),
///     early_departure_hours: Decimal::ZERO,
/// };
///
/// let result = calculate_attendance_deduction(&attendance, Decimal::new(100, 0), &working_time, 1).unwrap();
/// assert_eq!(result.deduction.total, Decimal::new(1900, 0));
/// ```
pub fn calculate_attendance_deduction(
    attendance: &AttendanceInput,
    hourly_rate: Decimal,
    working_time: &WorkingTime,
    step_number: u32,
) -> EngineResult<AttendanceDeductionResult> {
    let absence = in_range(
        attendance
            .absence_days
            .checked_mul(working_time.daily_hours)
            .and_then(|hours| hours.checked_mul(hourly_rate)),
        "attendance.absence_days",
    )?;
    let lateness = in_range(
        attendance.lateness_hours.checked_mul(hourly_rate),
        "attendance.lateness_hours",
    )?;
    let early_departure = in_range(
        attendance.early_departure_hours.checked_mul(hourly_rate),
        "attendance.early_departure_hours",
    )?;
    let total = checked_sum([absence, lateness, early_departure], "attendance")?;

    let deduction = AttendanceDeduction {
        absence,
        lateness,
        early_departure,
        total,
    };

    if total == Decimal::ZERO {
        return Ok(AttendanceDeductionResult {
            deduction,
            audit_step: None,
        });
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_deduction".to_string(),
        rule_name: "Attendance Deduction".to_string(),
        input: serde_json::json!({
            "absence_days": attendance.absence_days.normalize().to_string(),
            "lateness_hours": attendance.lateness_hours.normalize().to_string(),
            "early_departure_hours": attendance.early_departure_hours.normalize().to_string(),
            "hourly_rate": hourly_rate.normalize().to_string(),
            "daily_hours": working_time.daily_hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "absence": absence.normalize().to_string(),
            "lateness": lateness.normalize().to_string(),
            "early_departure": early_departure.normalize().to_string(),
            "total": total.normalize().to_string()
        }),
        reasoning: format!(
            "{} absence days × {}h × ${} + {}h late × ${} + {}h early × ${} = ${}",
            attendance.absence_days.normalize(),
            working_time.daily_hours.normalize(),
            hourly_rate.normalize(),
            attendance.lateness_hours.normalize(),
            hourly_rate.normalize(),
            attendance.early_departure_hours.normalize(),
            hourly_rate.normalize(),
            total.normalize()
        ),
    };

    Ok(AttendanceDeductionResult {
        deduction,
        audit_step: Some(audit_step),
    })
}
