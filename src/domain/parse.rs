use crate::domain::{CowrieEvent, normalize_timestamp};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Decodes one log line. Blank lines decode to `Ok(None)`.
pub fn decode_event_line(line: &str, line_no: usize) -> Result<Option<CowrieEvent>, DecodeError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(line)?;
    let Value::Object(fields) = value else {
        return Err(DecodeError::NotAnObject(json_kind(&value)));
    };

    let timestamp = string_field(&fields, "timestamp");
    let instant = normalize_timestamp(timestamp.as_deref().unwrap_or_default());

    Ok(Some(CowrieEvent {
        line_no,
        instant,
        src_ip: string_field(&fields, "src_ip"),
        timestamp,
        eventid: string_field(&fields, "eventid"),
        username: string_field(&fields, "username"),
        password: string_field(&fields, "password"),
        input: string_field(&fields, "input"),
        message: string_field(&fields, "message"),
    }))
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(text)) => Some(text.clone()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
