//! Boat finance calculators: fixed-rate amortization, side-by-side scenario
//! comparison and budget-driven affordability.

pub mod affordability;
pub mod amortization;
pub mod scenarios;
pub mod validation;
