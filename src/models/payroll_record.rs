//! Payroll record models for the payroll engine.
//!
//! This module contains the [`PayrollRecord`] type and its associated structures
//! that capture all outputs from a monthly payroll calculation: overtime lines,
//! attendance deductions, itemized statutory deductions, employer contributions,
//! review flags and the audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// Namespace for deterministic payroll record ids.
const PAYROLL_RECORD_NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_52c4_8d3e_4b7a_9f10_2e8c_5d4b_7a31);

/// The natural key of a payroll record: one employee in one month.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayPeriod, PayrollKey};
///
/// let period = PayPeriod::new(1, 2025).unwrap();
/// let a = PayrollKey::new("emp_001", period);
/// let b = PayrollKey::new("emp_001", period);
/// assert_eq!(a.record_id(), b.record_id());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayrollKey {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The month the record covers.
    pub period: PayPeriod,
}

impl PayrollKey {
    /// Creates a key for the employee and period.
    pub fn new(employee_id: impl Into<String>, period: PayPeriod) -> Self {
        Self {
            employee_id: employee_id.into(),
            period,
        }
    }

    /// Derives the record id from the key (UUID v5).
    pub fn record_id(&self) -> Uuid {
        let name = format!(
            "{}:{:04}-{:02}",
            self.employee_id, self.period.year, self.period.month
        );
        Uuid::new_v5(&PAYROLL_RECORD_NAMESPACE, name.as_bytes())
    }
}

/// The overtime category a line was paid under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeCategory {
    /// Weekday overtime.
    Weekday,
    /// Sunday or public-holiday overtime at the standard rate.
    Sunday,
    /// Sunday or public-holiday overtime at the premium rate.
    SundayPremium,
}

/// A single overtime pay line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeLine {
    /// The overtime category.
    pub category: OvertimeCategory,
    /// Hours worked in the category.
    pub hours: Decimal,
    /// The multiplier applied to the hourly rate.
    pub multiplier: Decimal,
    /// The effective hourly rate (hourly rate × multiplier).
    pub rate: Decimal,
    /// The amount paid (hours × rate).
    pub amount: Decimal,
}

/// Overtime pay for a period, one line per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeBreakdown {
    /// Weekday overtime.
    pub weekday: OvertimeLine,
    /// Sunday overtime at the standard rate.
    pub sunday: OvertimeLine,
    /// Sunday overtime at the premium rate.
    pub sunday_premium: OvertimeLine,
}

impl OvertimeBreakdown {
    /// Iterates the three lines in a fixed order.
    pub fn lines(&self) -> [&OvertimeLine; 3] {
        [&self.weekday, &self.sunday, &self.sunday_premium]
    }

    /// Total overtime hours.
    pub fn total_hours(&self) -> Decimal {
        self.lines().iter().map(|l| l.hours).sum()
    }

    /// Total overtime pay.
    pub fn total_amount(&self) -> Decimal {
        self.lines().iter().map(|l| l.amount).sum()
    }
}

/// Pay withheld for attendance shortfalls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDeduction {
    /// Deduction for absence days.
    pub absence: Decimal,
    /// Deduction for late arrival.
    pub lateness: Decimal,
    /// Deduction for early departure.
    pub early_departure: Decimal,
    /// Sum of the three amounts.
    pub total: Decimal,
}

/// The six statutory deductions withheld from an employee.
///
/// Each line is kept separately for audit; none are ever merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryDeductions {
    /// Pension contribution (employee share).
    pub pension: Decimal,
    /// Savings fund contribution (employee share).
    pub savings_fund: Decimal,
    /// Social contribution levy (employee share).
    pub social_contribution: Decimal,
    /// Income tax.
    pub income_tax: Decimal,
    /// Training levy.
    pub training_levy: Decimal,
    /// Guarantee fund contribution (employee share).
    pub guarantee_fund: Decimal,
}

impl StatutoryDeductions {
    /// The six lines in payslip order.
    pub fn items(&self) -> [Decimal; 6] {
        [
            self.pension,
            self.savings_fund,
            self.social_contribution,
            self.income_tax,
            self.training_levy,
            self.guarantee_fund,
        ]
    }

    /// Sum of all six lines.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::StatutoryDeductions;
    /// use rust_decimal::Decimal;
    ///
    /// let deductions = StatutoryDeductions {
    ///     pension: Decimal::new(3, 0),
    ///     savings_fund: Decimal::new(1, 0),
    ///     social_contribution: Decimal::new(2, 0),
    ///     income_tax: Decimal::new(10, 0),
    ///     training_levy: Decimal::new(1, 0),
    ///     guarantee_fund: Decimal::new(1, 0),
    /// };
    /// assert_eq!(deductions.total(), Decimal::new(18, 0));
    /// ```
    pub fn total(&self) -> Decimal {
        self.items().iter().sum()
    }
}

/// Contributions paid by the employer on top of gross salary.
///
/// These are payroll costs, not deductions from the employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    /// Pension contribution (employer share).
    pub pension: Decimal,
    /// Savings fund contribution (employer share).
    pub savings_fund: Decimal,
    /// Social contribution levy (employer share).
    pub social_contribution: Decimal,
    /// Sum of the employer contributions.
    pub total: Decimal,
}

/// A condition on a record that needs a person to look at it before paying.
///
/// Flags never stop a record from being produced; the engine reports the
/// fact and leaves the disbursement policy to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayrollFlag {
    /// Attendance deductions exceeded base salary plus overtime.
    NegativeGrossPay {
        /// The (negative) gross salary.
        amount: Decimal,
    },
    /// Deductions exceed gross salary; net pay is below zero.
    NegativeNetPay {
        /// How far below zero net pay is (a positive amount).
        shortfall: Decimal,
    },
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// Records every decision made during the calculation for transparency
/// and regulatory audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete payroll record for one employee and one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Deterministic id derived from employee id, month and year.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// The employee's display name at calculation time.
    pub employee_name: String,
    /// The month covered.
    pub period: PayPeriod,
    /// The month's English name.
    pub month_name: String,
    /// Version of the rate table the record was computed with.
    pub rate_table_version: String,
    /// Monthly base salary.
    pub basic_salary: Decimal,
    /// Hourly rate derived from the base salary.
    pub hourly_rate: Decimal,
    /// Overtime pay per category.
    pub overtime: OvertimeBreakdown,
    /// Total overtime hours.
    pub overtime_hours: Decimal,
    /// Total overtime pay.
    pub overtime_amount: Decimal,
    /// Pay withheld for attendance.
    pub attendance: AttendanceDeduction,
    /// Base salary plus overtime less attendance deductions. Never clamped.
    pub gross_salary: Decimal,
    /// The six itemized statutory deductions.
    pub deductions: StatutoryDeductions,
    /// Sum of the itemized deductions.
    pub total_deductions: Decimal,
    /// Gross salary less total deductions. May be negative.
    pub net_salary: Decimal,
    /// Employer-side contributions.
    pub employer_contributions: EmployerContributions,
    /// Conditions requiring review before disbursement.
    pub flags: Vec<PayrollFlag>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl PayrollRecord {
    /// The natural key of the record.
    pub fn key(&self) -> PayrollKey {
        PayrollKey::new(self.employee_id.clone(), self.period)
    }

    /// Returns true if net pay came out below zero.
    pub fn has_negative_net_pay(&self) -> bool {
        self.flags
            .iter()
            .any(|f| matches!(f, PayrollFlag::NegativeNetPay { .. }))
    }

    /// Returns true if any flag is raised.
    pub fn requires_review(&self) -> bool {
        !self.flags.is_empty()
    }
}
