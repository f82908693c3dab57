pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Result fields that hold row data rather than a single figure.
pub const ROW_FIELDS: [&str; 2] = ["payment_schedule", "rows"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of a computation envelope, or the value itself.
pub fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// First row-shaped array inside a result object.
pub fn rows_of(result: &Value) -> Option<&[Value]> {
    let map = result.as_object()?;
    ROW_FIELDS
        .iter()
        .find_map(|k| map.get(*k).and_then(|v| v.as_array()))
        .map(|v| v.as_slice())
}

/// Render a scalar for display in a table or CSV cell.
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_of_unwraps_envelope() {
        let value = json!({ "result": { "monthly_payment": "696.89" }, "warnings": [] });
        assert_eq!(result_of(&value), &json!({ "monthly_payment": "696.89" }));
        let bare = json!([1, 2]);
        assert_eq!(result_of(&bare), &bare);
    }

    #[test]
    fn test_rows_of_finds_schedule() {
        let result = json!({
            "monthly_payment": "1000.00",
            "payment_schedule": [{ "payment_number": 1 }, { "payment_number": 2 }]
        });
        assert_eq!(rows_of(&result).map(|r| r.len()), Some(2));
        assert!(rows_of(&json!({ "monthly_payment": "1000.00" })).is_none());
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(&json!("1000.00")), "1000.00");
        assert_eq!(cell(&json!(null)), "");
        assert_eq!(cell(&json!(["view_listings", "view_leads"])), "view_listings, view_leads");
        assert_eq!(cell(&json!(true)), "true");
    }
}
