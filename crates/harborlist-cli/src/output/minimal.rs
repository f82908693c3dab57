use serde_json::Value;

use super::{cell, result_of};

/// Headline figure of each computation, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "monthly_payment",
    "max_boat_price",
    "lowest_total_cost",
    "allowed",
    "permissions",
    "remaining_balance",
];

/// Print just the key answer value from the output.
///
/// Schedules print one `payment_number: total_payment` line per month.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Object(map) => {
            for key in &PRIORITY_KEYS {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", cell(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, cell(val));
            }
        }
        Value::Array(items) => {
            for item in items {
                match (item.get("payment_number"), item.get("total_payment")) {
                    (Some(n), Some(p)) => println!("{}: {}", cell(n), cell(p)),
                    _ => println!("{}", cell(item)),
                }
            }
        }
        other => println!("{}", cell(other)),
    }
}
