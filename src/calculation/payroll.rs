//! Monthly payroll calculation for a single employee.
//!
//! [`calculate_payroll`] is a pure function: the same inputs always yield the
//! same record. It performs no I/O and reads no clock; the creation timestamp
//! is supplied by the caller.
//!
//! ## Order of calculation
//!
//! 1. Hourly rate from base salary and standard monthly hours
//! 2. Overtime per category
//! 3. Attendance deductions
//! 4. Gross salary (base + overtime − attendance), never clamped
//! 5. The six statutory deductions, each computed independently
//! 6. Totals, net salary and review flags

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{ContributionBase, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceInput, AuditStep, AuditTrace, AuditWarning, Employee, EmployerContributions,
    OvertimeInput, PayPeriod, PayrollFlag, PayrollKey, PayrollRecord, StatutoryDeductions,
};

use super::{checked_sum, in_range};
use super::attendance::calculate_attendance_deduction;
use super::contributions::{FlatContribution, calculate_flat_contribution};
use super::hourly_rate::derive_hourly_rate;
use super::income_tax::calculate_income_tax;
use super::overtime::calculate_overtime;
use super::social_contribution::calculate_social_contribution;

/// Checks the employee-level preconditions.
fn validate_employee_input(
    employee: &Employee,
    overtime: &OvertimeInput,
    attendance: &AttendanceInput,
) -> EngineResult<()> {
    if !employee.is_active() {
        return Err(EngineError::InvalidInput {
            employee_id: employee.id.clone(),
            field: "status".to_string(),
            message: format!(
                "only active employees are processed (status is {})",
                employee.status.as_str()
            ),
        });
    }

    if employee.base_salary <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            employee_id: employee.id.clone(),
            field: "base_salary".to_string(),
            message: format!(
                "must be greater than 0 (got {})",
                employee.base_salary.normalize()
            ),
        });
    }

    overtime.validate(&employee.id)?;
    attendance.validate(&employee.id)
}

/// Calculates the payroll record for one employee and one month.
///
/// # Arguments
///
/// * `employee` - The employee being paid (must be active, salary > 0)
/// * `overtime` - Overtime hours per category
/// * `attendance` - Absence days, lateness and early-departure hours
/// * `period` - The month being paid
/// * `rates` - The rate table in effect for the period
/// * `created_at` - Timestamp to stamp on the record
///
/// # Errors
///
/// - [`EngineError::InvalidRateTable`] if `rates` is malformed; no partial
///   record is produced
/// - [`EngineError::InvalidInput`] for negative inputs, a non-positive base
///   salary, a non-active employee, or inputs so large that an amount falls
///   outside the decimal range (message "amount out of range")
/// - [`EngineError::InvalidPeriod`] if the period is not a real month
///
/// A negative net salary is not an error: the record carries a
/// [`PayrollFlag::NegativeNetPay`] flag instead.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{
///     AttendanceInput, Employee, EmploymentStatus, OvertimeInput, PayPeriod,
/// };
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/mauritius").unwrap();
/// let period = PayPeriod::new(8, 2025).unwrap();
/// let rates = loader.rate_table_for(period).unwrap();
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Priya Ramdin".to_string(),
///     base_salary: Decimal::new(20000, 0),
///     status: EmploymentStatus::Active,
/// };
/// let overtime = OvertimeInput {
///     weekday_hours: Decimal::new(5, 0),
///     ..Default::default()
/// };
///
/// let record = calculate_payroll(
///     &employee,
///     &overtime,
///     &AttendanceInput::default(),
///     period,
///     &rates,
///     Utc.with_ymd_and_hms(2025, 8, 31, 12, 0, 0).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(record.overtime_amount, Decimal::new(750, 0));
/// assert_eq!(record.gross_salary, Decimal::new(20750, 0));
/// assert_eq!(record.net_salary, record.gross_salary - record.total_deductions);
/// assert!(!record.requires_review());
/// ```
pub fn calculate_payroll(
    employee: &Employee,
    overtime: &OvertimeInput,
    attendance: &AttendanceInput,
    period: PayPeriod,
    rates: &RateTable,
    created_at: DateTime<Utc>,
) -> EngineResult<PayrollRecord> {
    rates.validate()?;
    period.validate()?;
    validate_employee_input(employee, overtime, attendance)?;

    build_record(employee, overtime, attendance, period, rates, created_at)
        .map_err(|e| e.for_employee(&employee.id))
}

/// Runs the calculation stages on already validated inputs.
fn build_record(
    employee: &Employee,
    overtime: &OvertimeInput,
    attendance: &AttendanceInput,
    period: PayPeriod,
    rates: &RateTable,
    created_at: DateTime<Utc>,
) -> EngineResult<PayrollRecord> {
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut flags: Vec<PayrollFlag> = Vec::new();
    let mut step_number: u32 = 1;

    // Hourly rate
    let hourly = derive_hourly_rate(employee.base_salary, &rates.working_time, step_number)?;
    let hourly_rate = hourly.hourly_rate;
    steps.push(hourly.audit_step);
    step_number += 1;

    // Overtime
    let overtime_result = calculate_overtime(overtime, hourly_rate, &rates.overtime, step_number)?;
    step_number += overtime_result.audit_steps.len() as u32;
    steps.extend(overtime_result.audit_steps);

    // Attendance
    let attendance_result =
        calculate_attendance_deduction(attendance, hourly_rate, &rates.working_time, step_number)?;
    if let Some(step) = attendance_result.audit_step {
        steps.push(step);
        step_number += 1;
    }

    let gross_salary = in_range(
        employee
            .base_salary
            .checked_add(overtime_result.total_amount)
            .and_then(|pay| pay.checked_sub(attendance_result.deduction.total)),
        "gross_salary",
    )?;

    if gross_salary < Decimal::ZERO {
        flags.push(PayrollFlag::NegativeGrossPay {
            amount: gross_salary,
        });
        warnings.push(AuditWarning {
            code: "NEGATIVE_GROSS_PAY".to_string(),
            message: format!(
                "Attendance deductions of ${} exceed base salary plus overtime; gross salary is ${}",
                attendance_result.deduction.total.normalize(),
                gross_salary.normalize()
            ),
            severity: "high".to_string(),
        });
    }

    // Statutory deductions are levied on a non-negative base so a negative
    // gross never turns a withholding into a refund.
    let contribution_base = gross_salary.max(Decimal::ZERO);
    let pensionable_pay = match rates.pension.base {
        ContributionBase::Gross => contribution_base,
        ContributionBase::BasicSalary => employee.base_salary,
    };

    let mut flat = |contribution: FlatContribution, base: Decimal, rate: Decimal| {
        let result = calculate_flat_contribution(contribution, base, rate, step_number);
        steps.push(result.audit_step);
        step_number += 1;
        result.amount
    };

    let pension = flat(
        FlatContribution::PensionEmployee,
        pensionable_pay,
        rates.pension.employee,
    );
    let savings_fund = flat(
        FlatContribution::SavingsFundEmployee,
        contribution_base,
        rates.savings_fund.employee,
    );
    let training_levy = flat(
        FlatContribution::TrainingLevy,
        contribution_base,
        rates.training_levy,
    );
    let guarantee_fund = flat(
        FlatContribution::GuaranteeFund,
        contribution_base,
        rates.guarantee_fund,
    );
    let pension_employer = flat(
        FlatContribution::PensionEmployer,
        pensionable_pay,
        rates.pension.employer,
    );
    let savings_fund_employer = flat(
        FlatContribution::SavingsFundEmployer,
        contribution_base,
        rates.savings_fund.employer,
    );

    let social = calculate_social_contribution(
        contribution_base,
        &rates.social_contribution,
        step_number,
    );
    steps.push(social.audit_step);
    step_number += 1;

    let income_tax = calculate_income_tax(contribution_base, &rates.tax_brackets, step_number)?;
    steps.push(income_tax.audit_step);

    let deductions = StatutoryDeductions {
        pension,
        savings_fund,
        social_contribution: social.employee_amount,
        income_tax: income_tax.tax,
        training_levy,
        guarantee_fund,
    };
    let total_deductions = checked_sum(deductions.items(), "total_deductions")?;
    let net_salary = in_range(gross_salary.checked_sub(total_deductions), "net_salary")?;

    if net_salary < Decimal::ZERO {
        flags.push(PayrollFlag::NegativeNetPay {
            shortfall: -net_salary,
        });
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_PAY".to_string(),
            message: format!(
                "Net salary is ${}; review before disbursement",
                net_salary.normalize()
            ),
            severity: "high".to_string(),
        });
    }

    let employer_contributions = EmployerContributions {
        pension: pension_employer,
        savings_fund: savings_fund_employer,
        social_contribution: social.employer_amount,
        total: checked_sum(
            [pension_employer, savings_fund_employer, social.employer_amount],
            "employer_contributions",
        )?,
    };

    let key = PayrollKey::new(employee.id.clone(), period);

    debug!(
        employee_id = %employee.id,
        period = %period,
        gross = %gross_salary,
        net = %net_salary,
        flags = flags.len(),
        "Payroll calculated"
    );

    Ok(PayrollRecord {
        id: key.record_id(),
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        period,
        month_name: period.month_name().to_string(),
        rate_table_version: rates.version.clone(),
        basic_salary: employee.base_salary,
        hourly_rate,
        overtime_hours: overtime_result.total_hours,
        overtime_amount: overtime_result.total_amount,
        overtime: overtime_result.breakdown,
        attendance: attendance_result.deduction,
        gross_salary,
        deductions,
        total_deductions,
        net_salary,
        employer_contributions,
        flags,
        audit_trace: AuditTrace { steps, warnings },
        created_at,
    })
}
