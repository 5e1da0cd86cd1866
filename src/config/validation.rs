//! Rate table validation.
//!
//! A rate table is checked when it is loaded or saved, and again before any
//! calculation uses it. Validation never coerces a value; it reports every
//! violation it finds.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult, RateViolation};

use super::types::RateTable;

fn check_fraction(violations: &mut Vec<RateViolation>, field: &str, value: Decimal) {
    if value < Decimal::ZERO || value > Decimal::ONE {
        violations.push(RateViolation::new(
            field,
            format!("must be between 0 and 1 (got {})", value.normalize()),
        ));
    }
}

fn check_multiplier(violations: &mut Vec<RateViolation>, field: &str, value: Decimal) {
    if value < Decimal::ONE {
        violations.push(RateViolation::new(
            field,
            format!("must be at least 1.0 (got {})", value.normalize()),
        ));
    }
}

fn check_positive(violations: &mut Vec<RateViolation>, field: &str, value: Decimal) {
    if value <= Decimal::ZERO {
        violations.push(RateViolation::new(
            field,
            format!("must be greater than 0 (got {})", value.normalize()),
        ));
    }
}

fn check_tax_brackets(violations: &mut Vec<RateViolation>, table: &RateTable) {
    let brackets = &table.tax_brackets;
    let Some(first) = brackets.first() else {
        violations.push(RateViolation::new(
            "tax_brackets",
            "at least one bracket is required",
        ));
        return;
    };

    if first.min != Decimal::ZERO {
        violations.push(RateViolation::new(
            "tax_brackets[0].min",
            format!("first bracket must start at 0 (got {})", first.min.normalize()),
        ));
    }

    let last_index = brackets.len() - 1;
    for (i, bracket) in brackets.iter().enumerate() {
        check_fraction(violations, &format!("tax_brackets[{i}].rate"), bracket.rate);

        match bracket.max {
            Some(max) if max <= bracket.min => violations.push(RateViolation::new(
                format!("tax_brackets[{i}].max"),
                format!(
                    "must be greater than min ({} <= {})",
                    max.normalize(),
                    bracket.min.normalize()
                ),
            )),
            Some(_) if i == last_index => violations.push(RateViolation::new(
                format!("tax_brackets[{i}].max"),
                "last bracket must be unbounded",
            )),
            None if i != last_index => violations.push(RateViolation::new(
                format!("tax_brackets[{i}].max"),
                "only the last bracket may be unbounded",
            )),
            _ => {}
        }

        if i > 0 {
            let previous = &brackets[i - 1];
            if let Some(previous_max) = previous.max {
                if bracket.min != previous_max {
                    violations.push(RateViolation::new(
                        format!("tax_brackets[{i}].min"),
                        format!(
                            "must equal the previous bracket's max ({} != {})",
                            bracket.min.normalize(),
                            previous_max.normalize()
                        ),
                    ));
                }
            }
        }
    }
}

impl RateTable {
    /// Returns every problem with the table; empty when the table is usable.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::RateTable;
    ///
    /// let yaml = std::fs::read_to_string("config/mauritius/rates/2025-07-01.yaml").unwrap();
    /// let mut table: RateTable = serde_yaml::from_str(&yaml).unwrap();
    /// assert!(table.violations().is_empty());
    ///
    /// table.tax_brackets.clear();
    /// table.overtime.weekday = "0.5".parse().unwrap();
    /// assert_eq!(table.violations().len(), 2);
    /// ```
    pub fn violations(&self) -> Vec<RateViolation> {
        let mut violations = Vec::new();

        if self.version.trim().is_empty() {
            violations.push(RateViolation::new("version", "must not be empty"));
        }

        check_positive(
            &mut violations,
            "working_time.monthly_hours",
            self.working_time.monthly_hours,
        );
        check_positive(
            &mut violations,
            "working_time.daily_hours",
            self.working_time.daily_hours,
        );

        check_fraction(&mut violations, "pension.employee", self.pension.employee);
        check_fraction(&mut violations, "pension.employer", self.pension.employer);
        check_fraction(
            &mut violations,
            "savings_fund.employee",
            self.savings_fund.employee,
        );
        check_fraction(
            &mut violations,
            "savings_fund.employer",
            self.savings_fund.employer,
        );

        let social = &self.social_contribution;
        if social.threshold < Decimal::ZERO {
            violations.push(RateViolation::new(
                "social_contribution.threshold",
                format!("must not be negative (got {})", social.threshold.normalize()),
            ));
        }
        check_fraction(
            &mut violations,
            "social_contribution.employee.lower",
            social.employee.lower,
        );
        check_fraction(
            &mut violations,
            "social_contribution.employee.higher",
            social.employee.higher,
        );
        check_fraction(
            &mut violations,
            "social_contribution.employer.lower",
            social.employer.lower,
        );
        check_fraction(
            &mut violations,
            "social_contribution.employer.higher",
            social.employer.higher,
        );

        check_fraction(&mut violations, "training_levy", self.training_levy);
        check_fraction(&mut violations, "guarantee_fund", self.guarantee_fund);

        check_multiplier(&mut violations, "overtime.weekday", self.overtime.weekday);
        check_multiplier(&mut violations, "overtime.sunday", self.overtime.sunday);
        check_multiplier(
            &mut violations,
            "overtime.sunday_premium",
            self.overtime.sunday_premium,
        );

        check_tax_brackets(&mut violations, self);

        violations
    }

    /// Fails with [`EngineError::InvalidRateTable`] if the table has any violation.
    pub fn validate(&self) -> EngineResult<()> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidRateTable { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ContributionBase, ContributionSplit, OvertimeMultipliers, PensionRates,
        SocialContributionRates, SteppedRate, TaxBracket, WorkingTime,
    };
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(min: &str, max: Option<&str>, rate: &str) -> TaxBracket {
        TaxBracket {
            min: dec(min),
            max: max.map(dec),
            rate: dec(rate),
        }
    }

    fn valid_table() -> RateTable {
        RateTable {
            version: "test".to_string(),
            effective_from: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            jurisdiction: "Mauritius".to_string(),
            working_time: WorkingTime {
                monthly_hours: dec("200"),
                daily_hours: dec("8"),
            },
            pension: PensionRates {
                employee: dec("0.03"),
                employer: dec("0.06"),
                base: ContributionBase::Gross,
            },
            savings_fund: ContributionSplit {
                employee: dec("0.01"),
                employer: dec("0.025"),
            },
            social_contribution: SocialContributionRates {
                threshold: dec("50000"),
                employee: SteppedRate {
                    lower: dec("0.015"),
                    higher: dec("0.03"),
                },
                employer: SteppedRate {
                    lower: dec("0.03"),
                    higher: dec("0.06"),
                },
            },
            training_levy: dec("0.015"),
            guarantee_fund: dec("0.01"),
            overtime: OvertimeMultipliers {
                weekday: dec("1.5"),
                sunday: dec("2"),
                sunday_premium: dec("3"),
            },
            tax_brackets: vec![
                bracket("0", Some("10000"), "0"),
                bracket("10000", Some("20000"), "0.1"),
                bracket("20000", None, "0.15"),
            ],
        }
    }

    fn fields(violations: &[RateViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_valid_table_has_no_violations() {
        assert!(valid_table().violations().is_empty());
        assert!(valid_table().validate().is_ok());
    }

    #[test]
    fn test_rate_above_one_is_rejected() {
        let mut table = valid_table();
        table.training_levy = dec("1.5");

        assert_eq!(fields(&table.violations()), vec!["training_levy"]);
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let mut table = valid_table();
        table.social_contribution.employer.lower = dec("-0.01");

        assert_eq!(
            fields(&table.violations()),
            vec!["social_contribution.employer.lower"]
        );
    }

    #[test]
    fn test_multiplier_below_one_is_rejected() {
        let mut table = valid_table();
        table.overtime.sunday_premium = dec("0.99");

        assert_eq!(fields(&table.violations()), vec!["overtime.sunday_premium"]);
    }

    #[test]
    fn test_zero_working_hours_is_rejected() {
        let mut table = valid_table();
        table.working_time.monthly_hours = Decimal::ZERO;

        assert_eq!(
            fields(&table.violations()),
            vec!["working_time.monthly_hours"]
        );
    }

    #[test]
    fn test_empty_brackets_are_rejected() {
        let mut table = valid_table();
        table.tax_brackets.clear();

        assert_eq!(fields(&table.violations()), vec!["tax_brackets"]);
    }

    #[test]
    fn test_gap_between_brackets_is_rejected() {
        let mut table = valid_table();
        table.tax_brackets[1].min = dec("12000");

        assert_eq!(fields(&table.violations()), vec!["tax_brackets[1].min"]);
    }

    #[test]
    fn test_bounded_last_bracket_is_rejected() {
        let mut table = valid_table();
        table.tax_brackets[2].max = Some(dec("1000000"));

        assert_eq!(fields(&table.violations()), vec!["tax_brackets[2].max"]);
    }

    #[test]
    fn test_unbounded_middle_bracket_is_rejected() {
        let mut table = valid_table();
        table.tax_brackets[1].max = None;

        assert_eq!(fields(&table.violations()), vec!["tax_brackets[1].max"]);
    }

    #[test]
    fn test_first_bracket_must_start_at_zero() {
        let mut table = valid_table();
        table.tax_brackets[0].min = dec("100");

        assert_eq!(fields(&table.violations()), vec!["tax_brackets[0].min"]);
    }

    #[test]
    fn test_inverted_bracket_is_rejected() {
        let mut table = valid_table();
        table.tax_brackets = vec![
            bracket("0", Some("10000"), "0"),
            bracket("10000", Some("5000"), "0.1"),
            bracket("5000", None, "0.15"),
        ];

        assert_eq!(fields(&table.violations()), vec!["tax_brackets[1].max"]);
    }

    #[test]
    fn test_every_violation_is_reported() {
        let mut table = valid_table();
        table.version = " ".to_string();
        table.pension.employee = dec("3");
        table.overtime.weekday = dec("0.5");
        table.tax_brackets[1].min = dec("11000");

        let violations = table.violations();
        assert_eq!(
            fields(&violations),
            vec![
                "version",
                "pension.employee",
                "overtime.weekday",
                "tax_brackets[1].min"
            ]
        );

        match table.validate() {
            Err(EngineError::InvalidRateTable { violations }) => assert_eq!(violations.len(), 4),
            other => panic!("Expected InvalidRateTable, got {:?}", other),
        }
    }
}
