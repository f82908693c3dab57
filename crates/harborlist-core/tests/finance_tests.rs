use chrono::NaiveDate;
use harborlist_core::finance::affordability::{self, AffordabilityInput};
use harborlist_core::finance::amortization::{self, LoanParameters};
use harborlist_core::finance::scenarios::{self, LoanScenario, ScenarioComparisonInput};
use harborlist_core::finance::validation;
use harborlist_core::HarborError;
use pretty_assertions::assert_eq;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

fn loan(boat_price: Decimal, down_payment: Decimal, rate: Decimal, term: u32) -> LoanParameters {
    LoanParameters {
        boat_price,
        down_payment,
        interest_rate: rate,
        term_months: term,
        start_date: None,
    }
}

// ===========================================================================
// Quote properties
// ===========================================================================

#[test]
fn test_standard_quote_matches_formula() {
    let params = loan(dec!(100000), dec!(20000), dec!(6.5), 180);
    let quote = amortization::calculate_loan(&params, false).unwrap().result;

    // Re-derive L·r·(1+r)^n / ((1+r)^n − 1) independently
    let r = dec!(0.065) / dec!(12);
    let growth = (Decimal::ONE + r).powi(180);
    let expected = dec!(80000) * r * growth / (growth - Decimal::ONE);

    assert_eq!(quote.loan_amount, dec!(80000));
    assert_eq!(quote.monthly_payment, amortization::round_currency(expected).unwrap());
    assert!((quote.total_interest - dec!(45439.46)).abs() <= dec!(0.01));
    assert_eq!(quote.total_cost, dec!(100000) + quote.total_interest);
}

#[test]
fn test_zero_rate_has_no_interest() {
    for (price, down, term) in [
        (dec!(12000), dec!(0), 12u32),
        (dec!(45999.99), dec!(5000), 84),
        (dec!(250000), dec!(25000), 360),
    ] {
        let quote = amortization::calculate_loan(&loan(price, down, dec!(0), term), false)
            .unwrap()
            .result;
        let loan_amount = price - down;
        assert_eq!(
            quote.monthly_payment,
            amortization::round_currency(loan_amount / Decimal::from(term)).unwrap()
        );
        assert!(quote.total_interest.abs() <= dec!(0.01));
    }
}

#[test]
fn test_twelve_month_interest_free() {
    let quote = amortization::calculate_loan(&loan(dec!(12000), dec!(0), dec!(0), 12), false)
        .unwrap()
        .result;
    assert_eq!(quote.monthly_payment.to_string(), "1000.00");
    assert_eq!(quote.total_interest, Decimal::ZERO);
    assert_eq!(quote.total_cost, dec!(12000));
}

#[test]
fn test_total_cost_is_price_plus_interest() {
    for (price, down, rate, term) in [
        (dec!(35000), dec!(3500), dec!(8.99), 120u32),
        (dec!(1200000), dec!(240000), dec!(5.25), 240),
        (dec!(18750.50), dec!(1875.05), dec!(12.5), 60),
        (dec!(100000), dec!(90000), dec!(30), 12),
    ] {
        let quote = amortization::calculate_loan(&loan(price, down, rate, term), false)
            .unwrap()
            .result;
        assert_eq!(quote.total_cost, price + quote.total_interest);
    }
}

#[test]
fn test_quote_is_idempotent() {
    let mut params = loan(dec!(64500), dec!(12900), dec!(7.49), 144);
    params.start_date = NaiveDate::from_ymd_opt(2025, 3, 15);
    let a = amortization::calculate_loan(&params, true).unwrap().result;
    let b = amortization::calculate_loan(&params, true).unwrap().result;
    assert_eq!(a, b);
}

#[test]
fn test_full_down_payment_costs_only_the_boat() {
    let quote = amortization::calculate_loan(&loan(dec!(50000), dec!(50000), dec!(6.5), 180), false)
        .unwrap()
        .result;
    assert_eq!(quote.loan_amount, Decimal::ZERO);
    assert_eq!(quote.monthly_payment, Decimal::ZERO);
    assert_eq!(quote.total_interest, Decimal::ZERO);
    assert_eq!(quote.total_cost, dec!(50000));
}

#[test]
fn test_out_of_range_is_computed_with_warnings() {
    let output = amortization::calculate_loan(&loan(dec!(800), dec!(0), dec!(45), 6), false).unwrap();
    assert!(output.result.monthly_payment > Decimal::ZERO);
    assert_eq!(output.warnings.len(), 4);
    assert!(validation::validate_loan_parameters(&loan(dec!(800), dec!(0), dec!(45), 6)).is_err());
}

// ===========================================================================
// Schedule properties
// ===========================================================================

#[test]
fn test_schedule_principal_sums_to_loan() {
    for (price, down, rate, term) in [
        (dec!(100000), dec!(20000), dec!(6.5), 180u32),
        (dec!(450000), dec!(45000), dec!(9.75), 360),
        (dec!(15000), dec!(1500), dec!(0), 36),
    ] {
        let params = loan(price, down, rate, term);
        let schedule = amortization::amortization_schedule(&params).unwrap();
        let principal: Decimal = schedule.iter().map(|i| i.principal_amount).sum();
        let drift = (principal - params.loan_amount().unwrap()).abs();
        assert!(
            drift <= Decimal::from(term) * dec!(0.01),
            "drift {drift} over {term} months"
        );
    }
}

#[test]
fn test_schedule_ends_at_zero_and_is_ordered() {
    let params = loan(dec!(450000), dec!(45000), dec!(9.75), 360);
    let schedule = amortization::amortization_schedule(&params).unwrap();
    assert_eq!(schedule.len(), 360);
    assert_eq!(schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    for (idx, item) in schedule.iter().enumerate() {
        assert_eq!(item.payment_number, idx as u32 + 1);
    }
    // Balance never increases on an amortizing loan
    for pair in schedule.windows(2) {
        assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
    }
}

#[test]
fn test_schedule_interest_front_loaded() {
    let params = loan(dec!(100000), dec!(20000), dec!(6.5), 180);
    let schedule = amortization::amortization_schedule(&params).unwrap();
    assert!(schedule[0].interest_amount > schedule[179].interest_amount);
    assert!(schedule[0].principal_amount < schedule[179].principal_amount);
}

#[test]
fn test_included_schedule_matches_standalone() {
    let params = loan(dec!(80000), dec!(8000), dec!(5.9), 96);
    let quote = amortization::calculate_loan(&params, true).unwrap().result;
    let standalone = amortization::amortization_schedule(&params).unwrap();
    assert_eq!(quote.payment_schedule.unwrap(), standalone);
}

#[test]
fn test_schedule_dates_follow_start_date() {
    let mut params = loan(dec!(30000), dec!(3000), dec!(6), 24);
    params.start_date = NaiveDate::from_ymd_opt(2025, 11, 15);
    let schedule = amortization::amortization_schedule(&params).unwrap();
    assert_eq!(schedule[0].payment_date, NaiveDate::from_ymd_opt(2025, 12, 15));
    assert_eq!(schedule[1].payment_date, NaiveDate::from_ymd_opt(2026, 1, 15));
    assert_eq!(schedule[23].payment_date, NaiveDate::from_ymd_opt(2027, 11, 15));
}

#[test]
fn test_zero_term_is_invalid_input() {
    let err = amortization::calculate_loan(&loan(dec!(30000), dec!(3000), dec!(6), 0), true).unwrap_err();
    assert!(matches!(err, HarborError::InvalidInput { ref field, .. } if field == "term_months"));
}

#[test]
fn test_negative_rate_is_quoted_below_straight_line() {
    let params = loan(dec!(11000), dec!(1000), dec!(-6), 120);
    let out = amortization::calculate_loan(&params, true).unwrap();
    let quote = out.result;

    assert!(quote.monthly_payment < dec!(10000) / Decimal::from(120));
    assert!(quote.total_interest < Decimal::ZERO);
    assert_eq!(quote.total_cost, dec!(11000) + quote.total_interest);
    assert!(out.warnings.iter().any(|w| w.starts_with("interest_rate:")));

    let schedule = quote.payment_schedule.unwrap();
    assert_eq!(schedule.len(), 120);
    assert_eq!(schedule.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_runaway_rate_reports_rate_field() {
    let err = amortization::calculate_loan(&loan(dec!(30000), dec!(3000), dec!(1000), 360), false)
        .unwrap_err();
    assert!(matches!(err, HarborError::InvalidInput { ref field, .. } if field == "rate"));
}

// ===========================================================================
// Decimal range
// ===========================================================================

#[test]
fn test_price_beyond_cent_range_is_invalid_input() {
    let params = loan(dec!(1000000000000000000000000000), Decimal::ZERO, Decimal::ZERO, 12);
    let err = amortization::calculate_loan(&params, true).unwrap_err();
    assert!(matches!(err, HarborError::InvalidInput { .. }));
}

#[test]
fn test_compounded_price_overflow_is_invalid_input() {
    let params = loan(dec!(50000000000000000000000000000), Decimal::ZERO, dec!(6.5), 180);
    let err = amortization::calculate_loan(&params, false).unwrap_err();
    assert!(matches!(err, HarborError::InvalidInput { .. }));
}

#[test]
fn test_large_price_within_range_is_quoted() {
    let params = loan(dec!(100000000000000000000000000), Decimal::ZERO, dec!(6.5), 180);
    let quote = amortization::calculate_loan(&params, false).unwrap().result;
    assert!(quote.monthly_payment > Decimal::ZERO);
    assert!((quote.total_cost - (params.boat_price + quote.total_interest)).abs() <= dec!(0.01));
}

#[test]
fn test_overflowing_loan_amount_is_a_range_violation() {
    let params = loan(dec!(50000000000000000000000000000), dec!(-50000000000000000000000000000), dec!(6.5), 180);
    let violations = validation::range_violations(&params);
    assert!(violations.iter().any(|v| v.field == "loan_amount"));
    assert!(validation::validate_loan_parameters(&params).is_err());
}

// ===========================================================================
// Serialization
// ===========================================================================

#[test]
fn test_parameters_deserialize_without_start_date() {
    let json = r#"{"boat_price":"100000","down_payment":"20000","interest_rate":"6.5","term_months":180}"#;
    let params: LoanParameters = serde_json::from_str(json).unwrap();
    assert_eq!(params, loan(dec!(100000), dec!(20000), dec!(6.5), 180));
}

#[test]
fn test_output_envelope_serializes_cents() {
    let output = amortization::calculate_loan(&loan(dec!(12000), dec!(0), dec!(0), 12), false).unwrap();
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["result"]["monthly_payment"], "1000.00");
    assert!(value["result"].get("payment_schedule").is_none());
    assert_eq!(value["methodology"], "Fixed-rate amortization");
}

// ===========================================================================
// Scenarios and affordability
// ===========================================================================

#[test]
fn test_scenario_deltas_against_baseline() {
    let input = ScenarioComparisonInput {
        scenarios: vec![
            LoanScenario {
                name: "Dealer rate".into(),
                parameters: loan(dec!(100000), dec!(20000), dec!(6.5), 180),
            },
            LoanScenario {
                name: "Bigger down payment".into(),
                parameters: loan(dec!(100000), dec!(40000), dec!(6.5), 180),
            },
        ],
    };
    let result = scenarios::compare_scenarios(&input).unwrap().result;
    let base = &result.rows[0];
    let other = &result.rows[1];
    assert_eq!(other.monthly_payment_delta, other.monthly_payment - base.monthly_payment);
    assert_eq!(result.lowest_total_cost, "Bigger down payment");
    assert_eq!(result.lowest_monthly_payment, "Bigger down payment");
}

#[test]
fn test_affordability_round_trips_through_calculator() {
    let input = AffordabilityInput {
        monthly_budget: dec!(696.89),
        down_payment: dec!(20000),
        interest_rate: dec!(6.5),
        term_months: 180,
    };
    let result = affordability::estimate_affordability(&input).unwrap().result;
    assert!((result.max_boat_price - dec!(100000)).abs() < dec!(1));
    assert!(result.monthly_payment <= dec!(696.89));
}
