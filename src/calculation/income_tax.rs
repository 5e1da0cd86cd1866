//! Income tax calculation.
//!
//! Income tax is marginal: each bracket taxes only the slice of income that
//! falls inside it, and the slices are summed. The final bracket has no
//! upper limit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{checked_sum, in_range};
use crate::config::TaxBracket;
use crate::error::{EngineError, EngineResult, RateViolation};
use crate::models::AuditStep;

/// The tax charged on one bracket's slice of income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlice {
    /// Bracket lower bound.
    pub min: Decimal,
    /// Bracket upper bound, `None` if unbounded.
    pub max: Option<Decimal>,
    /// Bracket rate.
    pub rate: Decimal,
    /// Income falling inside the bracket.
    pub taxable: Decimal,
    /// Tax on that income.
    pub tax: Decimal,
}

/// The result of the income tax calculation.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Total income tax.
    pub tax: Decimal,
    /// Slices for every bracket that taxed some income.
    pub slices: Vec<TaxSlice>,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Checks the structural preconditions of the bracket walk.
///
/// A full table is validated by [`crate::config::RateTable::validate`]; this
/// guard keeps the function itself from silently miscomputing when called
/// directly with a malformed list.
fn check_brackets(brackets: &[TaxBracket]) -> EngineResult<()> {
    let mut violations = Vec::new();

    match brackets.first() {
        None => violations.push(RateViolation::new(
            "tax_brackets",
            "at least one bracket is required",
        )),
        Some(first) if first.min != Decimal::ZERO => violations.push(RateViolation::new(
            "tax_brackets[0].min",
            "first bracket must start at 0",
        )),
        Some(_) => {}
    }

    for (i, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            violations.push(RateViolation::new(
                format!("tax_brackets[{i}].rate"),
                format!("must be between 0 and 1 (got {})", bracket.rate.normalize()),
            ));
        }
    }

    for (i, pair) in brackets.windows(2).enumerate() {
        if pair[0].max != Some(pair[1].min) {
            violations.push(RateViolation::new(
                format!("tax_brackets[{}].min", i + 1),
                "brackets must be contiguous",
            ));
        }
    }

    if brackets.last().is_some_and(|b| b.max.is_some()) {
        violations.push(RateViolation::new(
            format!("tax_brackets[{}].max", brackets.len() - 1),
            "last bracket must be unbounded",
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(EngineError::InvalidRateTable { violations })
    }
}

/// Calculates income tax on `income` over marginal brackets.
///
/// Income at or below zero is untaxed.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRateTable`] if the brackets are empty,
/// do not start at 0, are not contiguous, the last one is bounded, or a
/// rate lies outside 0 to 1. Returns [`EngineError::AmountOverflow`] if the
/// tax does not fit in a decimal.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_income_tax;
/// use payroll_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let brackets = vec![
///     TaxBracket { min: Decimal::ZERO, max: Some(Decimal::new(10000, 0)), rate: Decimal::ZERO },
///     TaxBracket { min: Decimal::new(10000, 0), max: Some(Decimal::new(20000, 0)), rate: Decimal::new(1, 1) },
///     TaxBracket { min: Decimal::new(20000, 0), max: None, rate: Decimal::new(15, 2) },
/// ];
///
/// let result = calculate_income_tax(Decimal::new(25000, 0), &brackets, 1).unwrap();
/// // 10,000 × 0% + 10,000 × 10% + 5,000 × 15%
/// assert_eq!(result.tax, Decimal::new(1750, 0));
/// ```
pub fn calculate_income_tax(
    income: Decimal,
    brackets: &[TaxBracket],
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    check_brackets(brackets)?;

    let mut slices = Vec::new();
    for bracket in brackets {
        let taxable = bracket.portion_of(income);
        if taxable > Decimal::ZERO {
            slices.push(TaxSlice {
                min: bracket.min,
                max: bracket.max,
                rate: bracket.rate,
                taxable,
                tax: in_range(taxable.checked_mul(bracket.rate), "income_tax")?,
            });
        }
    }

    let tax = checked_sum(slices.iter().map(|s| s.tax), "income_tax")?;

    let reasoning = if slices.is_empty() {
        format!("No taxable income (${})", income.normalize())
    } else {
        let parts: Vec<String> = slices
            .iter()
            .map(|s| {
                format!(
                    "${} × {}%",
                    s.taxable.normalize(),
                    (s.rate * Decimal::ONE_HUNDRED).normalize()
                )
            })
            .collect();
        format!("{} = ${}", parts.join(" + "), tax.normalize())
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax (Marginal Brackets)".to_string(),
        input: serde_json::json!({
            "income": income.normalize().to_string(),
            "brackets": brackets.len()
        }),
        output: serde_json::json!({
            "slices": slices
                .iter()
                .map(|s| serde_json::json!({
                    "min": s.min.normalize().to_string(),
                    "max": s.max.map(|m| m.normalize().to_string()),
                    "rate": s.rate.normalize().to_string(),
                    "taxable": s.taxable.normalize().to_string(),
                    "tax": s.tax.normalize().to_string()
                }))
                .collect::<Vec<_>>(),
            "tax": tax.normalize().to_string()
        }),
        reasoning,
    };

    Ok(IncomeTaxResult {
        tax,
        slices,
        audit_step,
    })
}
