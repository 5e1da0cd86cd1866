//! Flat-rate statutory contributions.
//!
//! Pension, savings fund, training levy and guarantee fund are all a fixed
//! fraction of a contribution base. Each is computed and audited separately.

use rust_decimal::Decimal;

use crate::models::AuditStep;

/// A statutory contribution levied at a flat rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatContribution {
    /// Pension, employee share.
    PensionEmployee,
    /// Pension, employer share.
    PensionEmployer,
    /// Savings fund, employee share.
    SavingsFundEmployee,
    /// Savings fund, employer share.
    SavingsFundEmployer,
    /// Training levy.
    TrainingLevy,
    /// Guarantee fund, employee share.
    GuaranteeFund,
}

impl FlatContribution {
    /// Rule id used in the audit trace.
    pub fn rule_id(&self) -> &'static str {
        match self {
            FlatContribution::PensionEmployee => "pension_employee",
            FlatContribution::PensionEmployer => "pension_employer",
            FlatContribution::SavingsFundEmployee => "savings_fund_employee",
            FlatContribution::SavingsFundEmployer => "savings_fund_employer",
            FlatContribution::TrainingLevy => "training_levy",
            FlatContribution::GuaranteeFund => "guarantee_fund",
        }
    }

    /// Human-readable rule name.
    pub fn rule_name(&self) -> &'static str {
        match self {
            FlatContribution::PensionEmployee => "Pension Contribution (Employee)",
            FlatContribution::PensionEmployer => "Pension Contribution (Employer)",
            FlatContribution::SavingsFundEmployee => "Savings Fund (Employee)",
            FlatContribution::SavingsFundEmployer => "Savings Fund (Employer)",
            FlatContribution::TrainingLevy => "Training Levy",
            FlatContribution::GuaranteeFund => "Guarantee Fund (Employee)",
        }
    }
}

/// The result of a flat contribution calculation.
#[derive(Debug, Clone)]
pub struct ContributionResult {
    /// The contribution amount.
    pub amount: Decimal,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Calculates `base × rate` for one contribution.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_flat_contribution, FlatContribution};
/// use rust_decimal::Decimal;
///
/// let result = calculate_flat_contribution(
///     FlatContribution::PensionEmployee,
///     Decimal::new(20750, 0),
///     Decimal::new(3, 2),
///     1,
/// );
/// assert_eq!(result.amount, Decimal::new(6225, 1));
/// ```
pub fn calculate_flat_contribution(
    contribution: FlatContribution,
    base: Decimal,
    rate: Decimal,
    step_number: u32,
) -> ContributionResult {
    let amount = base * rate;

    let audit_step = AuditStep {
        step_number,
        rule_id: contribution.rule_id().to_string(),
        rule_name: contribution.rule_name().to_string(),
        input: serde_json::json!({
            "base": base.normalize().to_string(),
            "rate": rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string()
        }),
        reasoning: format!(
            "${} × {}% = ${}",
            base.normalize(),
            (rate * Decimal::ONE_HUNDRED).normalize(),
            amount.normalize()
        ),
    };

    ContributionResult { amount, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_flat_contribution_amounts() {
        let gross = dec("20750");
        let cases = [
            (FlatContribution::PensionEmployee, "0.03", "622.5"),
            (FlatContribution::SavingsFundEmployee, "0.01", "207.5"),
            (FlatContribution::TrainingLevy, "0.015", "311.25"),
            (FlatContribution::GuaranteeFund, "0.01", "207.5"),
        ];

        for (contribution, rate, expected) in cases {
            let result = calculate_flat_contribution(contribution, gross, dec(rate), 1);
            assert_eq!(result.amount, dec(expected), "{:?}", contribution);
        }
    }

    #[test]
    fn test_zero_rate_yields_zero() {
        let result =
            calculate_flat_contribution(FlatContribution::PensionEmployer, dec("50000"), Decimal::ZERO, 1);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_audit_step_uses_contribution_rule() {
        let result =
            calculate_flat_contribution(FlatContribution::TrainingLevy, dec("20000"), dec("0.015"), 9);

        assert_eq!(result.audit_step.rule_id, "training_levy");
        assert_eq!(result.audit_step.step_number, 9);
        assert_eq!(result.audit_step.reasoning, "$20000 × 1.5% = $300");
    }
}
