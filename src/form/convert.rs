use serde_json::{Number, Value};

use crate::domain::FieldType;

use super::error::TypeMismatch;

/// Classify a raw value. Total: anything that is not a plain finite scalar
/// becomes `Json`.
pub fn detect_type(value: &Value) -> FieldType {
    match value {
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(num) if is_finite(num) => FieldType::Number,
        Value::String(_) => FieldType::String,
        Value::Number(_) | Value::Null | Value::Array(_) | Value::Object(_) => FieldType::Json,
    }
}

/// Render a value as editable text under `kind`.
///
/// `Json` values are pretty printed so nested data stays readable in a row.
pub fn render(kind: FieldType, value: &Value) -> Result<String, TypeMismatch> {
    match (kind, value) {
        (FieldType::String, Value::String(text)) => Ok(text.clone()),
        (FieldType::Number, Value::Number(num)) if is_finite(num) => Ok(num.to_string()),
        (FieldType::Boolean, Value::Bool(flag)) => Ok(flag.to_string()),
        (FieldType::Json, other) => serde_json::to_string_pretty(other)
            .map_err(|err| TypeMismatch::new(FieldType::Json, err.to_string())),
        (expected, other) => Err(TypeMismatch::new(
            expected,
            format!("cannot render {} as {expected}", describe(other)),
        )),
    }
}

/// Parse row text back into a value. `String` never fails.
pub fn parse(kind: FieldType, text: &str) -> Result<Value, TypeMismatch> {
    match kind {
        FieldType::String => Ok(Value::String(text.to_string())),
        FieldType::Number => parse_number(text),
        FieldType::Boolean => parse_bool(text),
        FieldType::Json => serde_json::from_str::<Value>(text)
            .map_err(|err| TypeMismatch::new(FieldType::Json, err.to_string())),
    }
}

/// Lossy text form used when a value cannot be rendered under its type.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

fn parse_number(text: &str) -> Result<Value, TypeMismatch> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TypeMismatch::new(FieldType::Number, "value is empty"));
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(Value::from(int));
    }
    if let Ok(uint) = trimmed.parse::<u64>() {
        return Ok(Value::from(uint));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| {
            TypeMismatch::new(
                FieldType::Number,
                format!("'{trimmed}' is not a finite number"),
            )
        })
}

fn parse_bool(text: &str) -> Result<Value, TypeMismatch> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(TypeMismatch::new(
            FieldType::Boolean,
            format!("'{trimmed}' is not true or false"),
        ))
    }
}

fn is_finite(num: &Number) -> bool {
    num.as_f64().is_some_and(f64::is_finite)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
