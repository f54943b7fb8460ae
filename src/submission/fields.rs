use serde_json::{Map, Value};

use crate::store::Row;

/// Flatten a submitted object into `(column, cell)` pairs, keeping field order.
pub fn to_row(data: Map<String, Value>) -> Row {
    data.into_iter()
        .map(|(name, value)| {
            let cell = cell_text(&value);
            (name, cell)
        })
        .collect()
}

/// Render one JSON value as CSV cell text. Strings are written verbatim,
/// `null` becomes an empty cell, everything else is its compact JSON text.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
