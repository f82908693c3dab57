use serde_json::Value;
use std::io;

use super::{cell, result_of, rows_of, ROW_FIELDS};

/// Write output as CSV to stdout.
///
/// Row data (schedules, scenario rows) is written one record per row;
/// otherwise the result is written as two-column `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = result_of(value);

    if let Some(rows) = rows_of(result) {
        write_rows(&mut wtr, rows);
    } else {
        match result {
            Value::Object(map) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    if !ROW_FIELDS.contains(&key.as_str()) {
                        let _ = wtr.write_record([key.as_str(), &cell(val)]);
                    }
                }
            }
            Value::Array(rows) => write_rows(&mut wtr, rows),
            other => {
                let _ = wtr.write_record([&cell(other)]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}
