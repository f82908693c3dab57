//! Budget-driven affordability: the most boat a monthly payment can buy.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HarborError;
use crate::finance::amortization::{calculate_loan, LoanParameters};
use crate::time_value;
use crate::types::*;
use crate::HarborResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    /// Largest monthly payment the buyer wants to make.
    pub monthly_budget: Money,
    pub down_payment: Money,
    /// Annual interest rate as a percentage.
    pub interest_rate: Percentage,
    pub term_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_loan_amount: Money,
    pub max_boat_price: Money,
    /// Payment on `max_loan_amount`; never above the budget.
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
}

/// Truncate to whole cents so the implied payment stays within budget.
fn floor_cents(value: Decimal) -> HarborResult<Money> {
    let mut cents = value
        .checked_mul(dec!(100))
        .ok_or_else(|| HarborError::overflow("max_loan_amount"))?
        .floor()
        / dec!(100);
    cents.rescale(2);
    Ok(cents)
}

pub fn estimate_affordability(
    input: &AffordabilityInput,
) -> HarborResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();

    if input.monthly_budget <= Decimal::ZERO {
        return Err(HarborError::InvalidInput {
            field: "monthly_budget".into(),
            reason: "Monthly budget must be positive".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(HarborError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative".into(),
        });
    }
    if input.term_months == 0 {
        return Err(HarborError::InvalidInput {
            field: "term_months".into(),
            reason: "Loan term must be at least one month".into(),
        });
    }

    let monthly_rate = input.interest_rate / dec!(100) / dec!(12);
    let present_value = time_value::pv(
        monthly_rate,
        input.term_months,
        -input.monthly_budget,
        Decimal::ZERO,
    )?;
    let max_loan_amount = floor_cents(present_value)?;
    let max_boat_price = max_loan_amount
        .checked_add(input.down_payment)
        .ok_or_else(|| HarborError::overflow("max_boat_price"))?;

    // Re-quote through the calculator so the figures and range warnings match
    // what the buyer sees
    let quote = calculate_loan(
        &LoanParameters {
            boat_price: max_boat_price,
            down_payment: input.down_payment,
            interest_rate: input.interest_rate,
            term_months: input.term_months,
            start_date: None,
        },
        false,
    )?;

    let output = AffordabilityOutput {
        max_loan_amount,
        max_boat_price,
        monthly_payment: quote.result.monthly_payment,
        total_interest: quote.result.total_interest,
        total_cost: quote.result.total_cost,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Affordability (present value of budget annuity)",
        &serde_json::json!({
            "monthly_budget": input.monthly_budget.to_string(),
            "down_payment": input.down_payment.to_string(),
            "annual_rate_pct": input.interest_rate.to_string(),
            "term_months": input.term_months,
        }),
        quote.warnings,
        elapsed,
        output,
    ))
}
