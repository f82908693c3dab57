//! Fixed-rate boat loan amortization.
//!
//! Computes the level monthly payment for a fully amortizing loan, the
//! derived interest and cost totals, and optionally the month-by-month
//! payment schedule. Every finance screen (calculator, scenario comparison,
//! shared calculation viewer) goes through [`calculate_loan`] so that the
//! cents they display agree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HarborError;
use crate::finance::validation::loan_parameter_warnings;
use crate::time_value;
use crate::types::*;
use crate::HarborResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan inputs as collected by the finance calculator form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Purchase price of the boat.
    pub boat_price: Money,
    /// Cash paid up front.
    pub down_payment: Money,
    /// Annual interest rate as a percentage (6.5 = 6.5% APR).
    pub interest_rate: Percentage,
    /// Loan term in months.
    pub term_months: u32,
    /// Date the loan is taken out; the first payment falls one month later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl LoanParameters {
    /// Amount financed: boat price less down payment.
    pub fn loan_amount(&self) -> HarborResult<Money> {
        self.boat_price
            .checked_sub(self.down_payment)
            .ok_or_else(|| HarborError::overflow("loan_amount"))
    }

    /// Periodic (monthly) rate as a decimal.
    pub fn monthly_rate(&self) -> Rate {
        self.interest_rate / PERCENT / MONTHS_PER_YEAR
    }
}

/// One month of the repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentScheduleItem {
    pub payment_number: u32,
    /// `None` when the loan has no start date.
    pub payment_date: Option<NaiveDate>,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub total_payment: Money,
    pub remaining_balance: Money,
}

/// Quote for a loan. Money fields are rounded to the cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    pub loan_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_schedule: Option<Vec<PaymentScheduleItem>>,
}

/// Unrounded loan terms shared by the quote and the schedule.
struct LoanTerms {
    loan_amount: Money,
    monthly_rate: Rate,
    monthly_payment: Money,
}

impl LoanTerms {
    fn derive(params: &LoanParameters) -> HarborResult<Self> {
        if params.term_months == 0 {
            return Err(HarborError::InvalidInput {
                field: "term_months".into(),
                reason: "Loan term must be at least one month".into(),
            });
        }

        let loan_amount = params.loan_amount()?;
        let monthly_rate = params.monthly_rate();
        // pmt() already falls back to straight-line repayment at a zero rate
        let monthly_payment =
            -time_value::pmt(monthly_rate, params.term_months, loan_amount, Decimal::ZERO)?;

        Ok(Self {
            loan_amount,
            monthly_rate,
            monthly_payment,
        })
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round to the cent, half-up: `floor(value * 100 + 0.5) / 100`.
///
/// Halves always round towards positive infinity, so `-0.005` becomes `0.00`.
/// Fails for values too large to scale to cents.
pub fn round_currency(value: Decimal) -> HarborResult<Money> {
    to_cents(value, "amount")
}

fn to_cents(value: Decimal, field: &str) -> HarborResult<Money> {
    let mut cents = value
        .checked_mul(PERCENT)
        .and_then(|scaled| scaled.checked_add(dec!(0.5)))
        .ok_or_else(|| HarborError::overflow(field))?
        .floor()
        / PERCENT;
    cents.rescale(2);
    Ok(cents)
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Quote a fixed-rate loan, optionally with its full payment schedule.
///
/// Inputs outside the form ranges are still computed and reported as
/// warnings. A zero-month term, or figures beyond the `Decimal` range, are
/// rejected as invalid input.
pub fn calculate_loan(
    params: &LoanParameters,
    include_schedule: bool,
) -> HarborResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let terms = LoanTerms::derive(params)?;
    let warnings = loan_parameter_warnings(params);

    let n = Decimal::from(params.term_months);
    let total_interest = terms
        .monthly_payment
        .checked_mul(n)
        .and_then(|total_payments| total_payments.checked_sub(terms.loan_amount))
        .ok_or_else(|| HarborError::overflow("total_interest"))?;
    let total_cost = params
        .boat_price
        .checked_add(total_interest)
        .ok_or_else(|| HarborError::overflow("total_cost"))?;

    let payment_schedule = if include_schedule {
        Some(build_schedule(&terms, params)?)
    } else {
        None
    };

    let output = CalculationResult {
        monthly_payment: to_cents(terms.monthly_payment, "monthly_payment")?,
        total_interest: to_cents(total_interest, "total_interest")?,
        total_cost: to_cents(total_cost, "total_cost")?,
        loan_amount: to_cents(terms.loan_amount, "loan_amount")?,
        payment_schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate amortization",
        &serde_json::json!({
            "boat_price": params.boat_price.to_string(),
            "down_payment": params.down_payment.to_string(),
            "annual_rate_pct": params.interest_rate.to_string(),
            "monthly_rate": terms.monthly_rate.to_string(),
            "term_months": params.term_months,
            "rounding": "half-up to cents, per field",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Month-by-month repayment schedule for the loan.
pub fn amortization_schedule(params: &LoanParameters) -> HarborResult<Vec<PaymentScheduleItem>> {
    let terms = LoanTerms::derive(params)?;
    build_schedule(&terms, params)
}

fn build_schedule(
    terms: &LoanTerms,
    params: &LoanParameters,
) -> HarborResult<Vec<PaymentScheduleItem>> {
    let mut items = Vec::with_capacity(params.term_months as usize);
    let mut balance = terms.loan_amount;
    let total_payment = to_cents(terms.monthly_payment, "monthly_payment")?;

    for payment_number in 1..=params.term_months {
        let interest = balance
            .checked_mul(terms.monthly_rate)
            .ok_or_else(|| HarborError::overflow("interest_amount"))?;
        let principal = terms
            .monthly_payment
            .checked_sub(interest)
            .ok_or_else(|| HarborError::overflow("principal_amount"))?;
        balance = balance
            .checked_sub(principal)
            .ok_or_else(|| HarborError::overflow("remaining_balance"))?;

        // Absorb residual drift on the final payment
        let remaining_balance = if payment_number == params.term_months {
            Decimal::ZERO
        } else {
            balance
        };

        let payment_date = match params.start_date {
            Some(start) => Some(
                start
                    .checked_add_months(Months::new(payment_number))
                    .ok_or_else(|| {
                        HarborError::DateError(format!(
                            "Payment {payment_number} falls outside the supported calendar"
                        ))
                    })?,
            ),
            None => None,
        };

        items.push(PaymentScheduleItem {
            payment_number,
            payment_date,
            principal_amount: to_cents(principal, "principal_amount")?,
            interest_amount: to_cents(interest, "interest_amount")?,
            total_payment,
            remaining_balance: to_cents(remaining_balance, "remaining_balance")?,
        });
    }

    Ok(items)
}
