use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::HarborError;
use crate::types::{Money, Rate};
use crate::HarborResult;

/// Compound growth factor `(1 + rate)^nper`.
fn growth_factor(rate: Rate, nper: u32) -> HarborResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| HarborError::InvalidInput {
            field: "rate".into(),
            reason: format!("Compounding {rate} over {nper} periods overflows"),
        })
}

/// Present Value of a level payment stream.
///
/// Sign convention follows spreadsheet PV: payments made (negative) give a
/// positive present value.
pub fn pv(rate: Rate, nper: u32, pmt: Money, fv: Money) -> HarborResult<Money> {
    if rate.is_zero() {
        return pmt
            .checked_mul(Decimal::from(nper))
            .and_then(|total| total.checked_add(fv))
            .map(|total| -total)
            .ok_or_else(|| HarborError::overflow("pmt"));
    }

    let factor = growth_factor(rate, nper)?;
    if factor.is_zero() {
        return Err(HarborError::DivisionByZero {
            context: "PV factor".into(),
        });
    }

    let annuity_factor = Decimal::ONE
        .checked_div(factor)
        .and_then(|discount| (Decimal::ONE - discount).checked_div(rate))
        .ok_or_else(|| HarborError::overflow("rate"))?;
    let discounted_fv = fv
        .checked_div(factor)
        .ok_or_else(|| HarborError::overflow("fv"))?;

    pmt.checked_mul(annuity_factor)
        .and_then(|annuity| annuity.checked_add(discounted_fv))
        .map(|value| -value)
        .ok_or_else(|| HarborError::overflow("pmt"))
}

/// Payment (PMT) that amortises `present_value` to `future_value` over `nper`
/// periods. A positive loan balance yields a negative payment.
pub fn pmt(
    rate: Rate,
    nper: u32,
    present_value: Money,
    future_value: Money,
) -> HarborResult<Money> {
    if nper == 0 {
        return Err(HarborError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return present_value
            .checked_add(future_value)
            .map(|total| -total / Decimal::from(nper))
            .ok_or_else(|| HarborError::overflow("present_value"));
    }

    let factor = growth_factor(rate, nper)?;
    let annuity_factor = factor
        .checked_sub(Decimal::ONE)
        .and_then(|growth| growth.checked_div(rate))
        .ok_or_else(|| HarborError::overflow("rate"))?;

    if annuity_factor.is_zero() {
        return Err(HarborError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    present_value
        .checked_mul(factor)
        .and_then(|compounded| compounded.checked_add(future_value))
        .and_then(|balance| balance.checked_div(annuity_factor))
        .map(|payment| -payment)
        .ok_or_else(|| HarborError::overflow("present_value"))
}
