use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use harborlist_core::finance::affordability::{self, AffordabilityInput};
use harborlist_core::finance::amortization::{self, LoanParameters};
use harborlist_core::finance::scenarios::{self, ScenarioComparisonInput};
use harborlist_core::finance::validation;

use crate::input;

/// Arguments for loan quotes and payment schedules
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Boat purchase price
    #[arg(long, alias = "price")]
    pub boat_price: Option<Decimal>,

    /// Down payment
    #[arg(long, alias = "down", default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate as a percentage (6.5 = 6.5%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,

    /// Loan start date (YYYY-MM-DD); payments fall monthly from here
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Include the full payment schedule in the quote
    #[arg(long)]
    pub schedule: bool,

    /// Reject parameters outside the finance form ranges instead of warning
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for affordability estimates
#[derive(Args)]
pub struct AffordArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Maximum monthly payment
    #[arg(long, alias = "budget")]
    pub monthly_budget: Option<Decimal>,

    /// Down payment
    #[arg(long, alias = "down", default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate as a percentage
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,
}

fn loan_parameters(args: &LoanArgs) -> Result<LoanParameters, Box<dyn std::error::Error>> {
    let mut params = match input::load::<LoanParameters>(args.input.as_deref())? {
        Some(params) => params,
        None => LoanParameters {
            boat_price: args
                .boat_price
                .ok_or("--boat-price is required (or provide --input)")?,
            down_payment: args.down_payment,
            interest_rate: args
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            start_date: None,
        },
    };
    if args.start_date.is_some() {
        params.start_date = args.start_date;
    }
    if args.strict {
        validation::validate_loan_parameters(&params)?;
    }
    Ok(params)
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = loan_parameters(&args)?;
    let result = amortization::calculate_loan(&params, args.schedule)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = loan_parameters(&args)?;
    for warning in validation::loan_parameter_warnings(&params) {
        log::warn!("{warning}");
    }
    let schedule = amortization::amortization_schedule(&params)?;
    Ok(serde_json::to_value(schedule)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison: ScenarioComparisonInput = input::load(args.input.as_deref())?
        .ok_or("--input <file> or stdin required for scenario comparison")?;
    let result = scenarios::compare_scenarios(&comparison)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_afford(args: AffordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input = match input::load::<AffordabilityInput>(args.input.as_deref())? {
        Some(input) => input,
        None => AffordabilityInput {
            monthly_budget: args
                .monthly_budget
                .ok_or("--monthly-budget is required (or provide --input)")?,
            down_payment: args.down_payment,
            interest_rate: args
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
        },
    };
    let result = affordability::estimate_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
