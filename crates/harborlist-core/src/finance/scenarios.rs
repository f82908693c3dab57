//! Side-by-side comparison of loan scenarios.
//!
//! The first scenario is the baseline; every other row reports its
//! differences against it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::error::HarborError;
use crate::finance::amortization::{calculate_loan, LoanParameters};
use crate::types::*;
use crate::HarborResult;

/// Upper bound on scenarios evaluated in one comparison.
pub const MAX_SCENARIOS: usize = 10;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanScenario {
    pub name: String,
    pub parameters: LoanParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonInput {
    pub scenarios: Vec<LoanScenario>,
}

/// One evaluated scenario with its deltas against the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub name: String,
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    pub monthly_payment_delta: Money,
    pub total_interest_delta: Money,
    pub total_cost_delta: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub baseline: String,
    pub rows: Vec<ScenarioRow>,
    pub lowest_monthly_payment: String,
    pub lowest_total_interest: String,
    pub lowest_total_cost: String,
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

pub fn compare_scenarios(
    input: &ScenarioComparisonInput,
) -> HarborResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    validate_input(input)?;

    let mut warnings = Vec::new();
    let mut rows: Vec<ScenarioRow> = Vec::with_capacity(input.scenarios.len());

    for scenario in &input.scenarios {
        let quote = calculate_loan(&scenario.parameters, false)?;
        warnings.extend(
            quote
                .warnings
                .iter()
                .map(|w| format!("{}: {}", scenario.name, w)),
        );
        let q = quote.result;
        rows.push(ScenarioRow {
            name: scenario.name.clone(),
            loan_amount: q.loan_amount,
            monthly_payment: q.monthly_payment,
            total_interest: q.total_interest,
            total_cost: q.total_cost,
            monthly_payment_delta: Decimal::ZERO,
            total_interest_delta: Decimal::ZERO,
            total_cost_delta: Decimal::ZERO,
        });
    }

    let (base_payment, base_interest, base_cost) = {
        let base = &rows[0];
        (base.monthly_payment, base.total_interest, base.total_cost)
    };
    for row in rows.iter_mut() {
        row.monthly_payment_delta = row.monthly_payment - base_payment;
        row.total_interest_delta = row.total_interest - base_interest;
        row.total_cost_delta = row.total_cost - base_cost;
    }

    let output = ScenarioComparison {
        baseline: rows[0].name.clone(),
        lowest_monthly_payment: lowest_by(&rows, |r| r.monthly_payment),
        lowest_total_interest: lowest_by(&rows, |r| r.total_interest),
        lowest_total_cost: lowest_by(&rows, |r| r.total_cost),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan scenario comparison",
        &serde_json::json!({
            "scenarios": input.scenarios.len(),
            "baseline": output.baseline,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &ScenarioComparisonInput) -> HarborResult<()> {
    if input.scenarios.is_empty() {
        return Err(HarborError::InsufficientData(
            "Scenario comparison requires at least one scenario".into(),
        ));
    }
    if input.scenarios.len() > MAX_SCENARIOS {
        return Err(HarborError::InvalidInput {
            field: "scenarios".into(),
            reason: format!("At most {MAX_SCENARIOS} scenarios can be compared"),
        });
    }

    let mut seen = HashSet::new();
    for scenario in &input.scenarios {
        if scenario.name.trim().is_empty() {
            return Err(HarborError::InvalidInput {
                field: "name".into(),
                reason: "Scenario name cannot be blank".into(),
            });
        }
        if !seen.insert(scenario.name.as_str()) {
            return Err(HarborError::InvalidInput {
                field: "name".into(),
                reason: format!("Duplicate scenario name '{}'", scenario.name),
            });
        }
    }
    Ok(())
}

/// Name of the row with the smallest metric; the earliest row wins ties.
fn lowest_by(rows: &[ScenarioRow], metric: impl Fn(&ScenarioRow) -> Money) -> String {
    let mut best = &rows[0];
    for row in &rows[1..] {
        if metric(row) < metric(best) {
            best = row;
        }
    }
    best.name.clone()
}
