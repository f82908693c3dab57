use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use harborlist_core::dealer::permissions;
use harborlist_core::finance::{affordability, amortization, scenarios};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

/// Request body of the save/share endpoint: loan parameters plus an optional
/// schedule flag, as posted by the finance calculator.
#[derive(Deserialize)]
struct LoanRequest {
    #[serde(flatten)]
    parameters: amortization::LoanParameters,
    #[serde(default)]
    include_schedule: bool,
}

#[napi]
pub fn calculate_loan(input_json: String, include_schedule: Option<bool>) -> NapiResult<String> {
    let request: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let include = include_schedule.unwrap_or(request.include_schedule);
    let output =
        amortization::calculate_loan(&request.parameters, include).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: amortization::LoanParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = amortization::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

#[napi]
pub fn compare_loan_scenarios(input_json: String) -> NapiResult<String> {
    let input: scenarios::ScenarioComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = scenarios::compare_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn estimate_affordability(input_json: String) -> NapiResult<String> {
    let input: affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = affordability::estimate_affordability(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Dealer accounts
// ---------------------------------------------------------------------------

#[napi]
pub fn check_dealer_access(input_json: String) -> NapiResult<String> {
    let input: permissions::AccessCheckInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    permissions::validate_sub_account(&input.sub_account).map_err(to_napi_error)?;
    let output = permissions::check_access(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
