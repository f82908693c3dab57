use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, result_of, rows_of, ROW_FIELDS};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go into a Field/Value table; schedules and scenario
/// rows are printed as their own table underneath.
pub fn print_table(value: &Value) {
    let result = result_of(value);
    match result {
        Value::Object(fields) => {
            print_fields(fields);
            if let Some(rows) = rows_of(result) {
                println!();
                print_rows(rows);
            }
            if let Value::Object(envelope) = value {
                print_envelope_notes(envelope);
            }
        }
        Value::Array(rows) => print_rows(rows),
        other => println!("{}", cell(other)),
    }
}

fn print_fields(result: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result {
        if ROW_FIELDS.contains(&key.as_str()) {
            continue;
        }
        builder.push_record([key.as_str(), &cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", cell(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
