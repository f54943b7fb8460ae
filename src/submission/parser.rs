use serde_json::{Map, Value};

pub const NO_DATA: &str = "No data received";

/// Parse a request body into the submitted object.
///
/// The body is always treated as JSON, whatever the Content-Type says. A
/// missing body, `null`, or an empty value (`{}`, `[]`, `""`, `0`, `false`)
/// is reported as [`NO_DATA`].
pub fn parse_body(body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(NO_DATA.to_string());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?;

    if is_empty(&value) {
        return Err(NO_DATA.to_string());
    }

    match value {
        Value::Object(map) => Ok(map),
        _ => Err("Expected a JSON object".to_string()),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        Value::Object(obj) => obj.is_empty(),
    }
}
