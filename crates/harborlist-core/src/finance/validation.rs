//! Range rules applied by the finance forms before a loan is quoted.
//!
//! The calculator itself is permissive; these rules are either enforced up
//! front with [`validate_loan_parameters`] or surfaced as envelope warnings
//! through [`loan_parameter_warnings`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::HarborError;
use crate::finance::amortization::LoanParameters;
use crate::types::{Money, Percentage};
use crate::HarborResult;

pub const MIN_BOAT_PRICE: Money = dec!(1000);
pub const MIN_LOAN_AMOUNT: Money = dec!(1000);
pub const MAX_DOWN_PAYMENT_RATIO: Decimal = dec!(0.9);
pub const MAX_INTEREST_RATE: Percentage = dec!(30);
pub const MIN_TERM_MONTHS: u32 = 12;
pub const MAX_TERM_MONTHS: u32 = 360;

/// A single broken range rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeViolation {
    pub field: &'static str,
    pub reason: String,
}

impl From<RangeViolation> for HarborError {
    fn from(v: RangeViolation) -> Self {
        HarborError::InvalidInput {
            field: v.field.into(),
            reason: v.reason,
        }
    }
}

/// Every range rule the parameters break, in form field order.
pub fn range_violations(params: &LoanParameters) -> Vec<RangeViolation> {
    let mut violations = Vec::new();

    if params.boat_price < MIN_BOAT_PRICE {
        violations.push(RangeViolation {
            field: "boat_price",
            reason: format!("Boat price must be at least {MIN_BOAT_PRICE}"),
        });
    }

    if params.down_payment < Decimal::ZERO {
        violations.push(RangeViolation {
            field: "down_payment",
            reason: "Down payment cannot be negative".into(),
        });
    } else if params.down_payment > params.boat_price * MAX_DOWN_PAYMENT_RATIO {
        violations.push(RangeViolation {
            field: "down_payment",
            reason: "Down payment cannot exceed 90% of the boat price".into(),
        });
    }

    if params.interest_rate < Decimal::ZERO || params.interest_rate > MAX_INTEREST_RATE {
        violations.push(RangeViolation {
            field: "interest_rate",
            reason: format!("Interest rate must be between 0% and {MAX_INTEREST_RATE}%"),
        });
    }

    if !(MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(&params.term_months) {
        violations.push(RangeViolation {
            field: "term_months",
            reason: format!(
                "Loan term must be between {MIN_TERM_MONTHS} and {MAX_TERM_MONTHS} months"
            ),
        });
    }

    match params.loan_amount() {
        Ok(loan_amount) if loan_amount < MIN_LOAN_AMOUNT => violations.push(RangeViolation {
            field: "loan_amount",
            reason: format!("Loan amount must be at least {MIN_LOAN_AMOUNT} (got {loan_amount})"),
        }),
        Ok(_) => {}
        Err(_) => violations.push(RangeViolation {
            field: "loan_amount",
            reason: "Loan amount exceeds the supported decimal range".into(),
        }),
    }

    violations
}

/// Reject parameters outside the quotable ranges, reporting the first rule broken.
pub fn validate_loan_parameters(params: &LoanParameters) -> HarborResult<()> {
    match range_violations(params).into_iter().next() {
        Some(violation) => Err(violation.into()),
        None => Ok(()),
    }
}

/// Range violations rendered as envelope warnings.
pub fn loan_parameter_warnings(params: &LoanParameters) -> Vec<String> {
    range_violations(params)
        .into_iter()
        .map(|v| format!("{}: {}", v.field, v.reason))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LoanParameters {
        LoanParameters {
            boat_price: dec!(100000),
            down_payment: dec!(20000),
            interest_rate: dec!(6.5),
            term_months: 180,
            start_date: None,
        }
    }

    #[test]
    fn test_valid_parameters_pass() {
        assert!(validate_loan_parameters(&params()).is_ok());
        assert!(loan_parameter_warnings(&params()).is_empty());
    }

    #[test]
    fn test_down_payment_cap() {
        let mut p = params();
        p.down_payment = dec!(90000);
        assert!(validate_loan_parameters(&p).is_ok());
        p.down_payment = dec!(90000.01);
        let err = validate_loan_parameters(&p).unwrap_err();
        assert!(matches!(err, HarborError::InvalidInput { ref field, .. } if field == "down_payment"));
    }

    #[test]
    fn test_term_bounds() {
        let mut p = params();
        p.term_months = 11;
        assert!(validate_loan_parameters(&p).is_err());
        p.term_months = 361;
        assert!(validate_loan_parameters(&p).is_err());
        p.term_months = 360;
        assert!(validate_loan_parameters(&p).is_ok());
    }

    #[test]
    fn test_rate_bounds() {
        let mut p = params();
        p.interest_rate = dec!(30.01);
        assert!(validate_loan_parameters(&p).is_err());
        p.interest_rate = dec!(-0.5);
        assert!(validate_loan_parameters(&p).is_err());
        p.interest_rate = dec!(0);
        assert!(validate_loan_parameters(&p).is_ok());
    }

    #[test]
    fn test_small_loan_reports_every_rule() {
        let p = LoanParameters {
            boat_price: dec!(500),
            down_payment: dec!(0),
            interest_rate: dec!(40),
            term_months: 6,
            start_date: None,
        };
        let fields: Vec<&str> = range_violations(&p).iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["boat_price", "interest_rate", "term_months", "loan_amount"]);
    }
}
