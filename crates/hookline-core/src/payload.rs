//! Inbound payload extraction.

use serde_json::Value;

use hookline_protocols::error::TriggerDispatchError;

/// Parse a webhook body into a JSON object.
///
/// The body is parsed as JSON whatever the declared content type. Blank
/// bodies and falsy JSON values count as empty.
pub fn extract_payload(body: &[u8]) -> Result<Value, TriggerDispatchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(TriggerDispatchError::EmptyBody);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| TriggerDispatchError::InvalidPayload(e.to_string()))?;

    if is_falsy(&value) {
        return Err(TriggerDispatchError::EmptyBody);
    }

    if !value.is_object() {
        return Err(TriggerDispatchError::InvalidPayload(format!(
            "expected a JSON object, got {}",
            kind_of(&value)
        )));
    }

    Ok(value)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
