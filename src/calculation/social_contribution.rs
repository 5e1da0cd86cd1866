//! Social contribution levy.
//!
//! The levy is a step function, not a marginal bracket: the *whole* income
//! is charged at the lower rate when it is at or below the threshold, and
//! at the higher rate when it is above.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SocialContributionRates;
use crate::models::AuditStep;

/// Which side of the threshold an income fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyBand {
    /// Income at or below the threshold.
    Lower,
    /// Income above the threshold.
    Higher,
}

/// The result of the social contribution calculation.
#[derive(Debug, Clone)]
pub struct SocialContributionResult {
    /// The band the income fell in.
    pub band: LevyBand,
    /// Employee rate applied.
    pub employee_rate: Decimal,
    /// Employee contribution.
    pub employee_amount: Decimal,
    /// Employer rate applied.
    pub employer_rate: Decimal,
    /// Employer contribution.
    pub employer_amount: Decimal,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee and employer social contribution on `income`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_social_contribution, LevyBand};
/// use payroll_engine::config::{SocialContributionRates, SteppedRate};
/// use rust_decimal::Decimal;
///
/// let rates = SocialContributionRates {
///     threshold: Decimal::new(50000, 0),
///     employee: SteppedRate { lower: Decimal::new(15, 3), higher: Decimal::new(3, 2) },
///     employer: SteppedRate { lower: Decimal::new(3, 2), higher: Decimal::new(6, 2) },
/// };
///
/// let below = calculate_social_contribution(Decimal::new(49999, 0), &rates, 1);
/// assert_eq!(below.band, LevyBand::Lower);
/// assert_eq!(below.employee_amount, Decimal::new(749985, 3));
///
/// let above = calculate_social_contribution(Decimal::new(50001, 0), &rates, 1);
/// assert_eq!(above.band, LevyBand::Higher);
/// assert_eq!(above.employee_amount, Decimal::new(150003, 2));
/// ```
pub fn calculate_social_contribution(
    income: Decimal,
    rates: &SocialContributionRates,
    step_number: u32,
) -> SocialContributionResult {
    let (band, employee_rate, employer_rate) = if income <= rates.threshold {
        (LevyBand::Lower, rates.employee.lower, rates.employer.lower)
    } else {
        (LevyBand::Higher, rates.employee.higher, rates.employer.higher)
    };

    let employee_amount = income * employee_rate;
    let employer_amount = income * employer_rate;

    let comparison = match band {
        LevyBand::Lower => "at or below",
        LevyBand::Higher => "above",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "social_contribution".to_string(),
        rule_name: "Social Contribution Levy".to_string(),
        input: serde_json::json!({
            "income": income.normalize().to_string(),
            "threshold": rates.threshold.normalize().to_string()
        }),
        output: serde_json::json!({
            "band": band,
            "employee_rate": employee_rate.normalize().to_string(),
            "employee_amount": employee_amount.normalize().to_string(),
            "employer_rate": employer_rate.normalize().to_string(),
            "employer_amount": employer_amount.normalize().to_string()
        }),
        reasoning: format!(
            "Income ${} is {} the ${} threshold; whole income at {}% = ${}",
            income.normalize(),
            comparison,
            rates.threshold.normalize(),
            (employee_rate * Decimal::ONE_HUNDRED).normalize(),
            employee_amount.normalize()
        ),
    };

    SocialContributionResult {
        band,
        employee_rate,
        employee_amount,
        employer_rate,
        employer_amount,
        audit_step,
    }
}
