use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

use crate::domain::SerializedFieldSet;

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse with `preferred` first, then every other compiled-in format.
pub fn parse_document_any(contents: &str, preferred: DocumentFormat) -> Result<Value> {
    let primary = match parse_document_str(contents, preferred) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    for candidate in DocumentFormat::available_formats() {
        if candidate == preferred {
            continue;
        }
        if let Ok(value) = parse_document_str(contents, candidate) {
            return Ok(value);
        }
    }
    let tried = DocumentFormat::available_formats()
        .into_iter()
        .map(|format| format.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(primary.context(format!("tried {tried}")))
}

/// Accept a document as a field set. `null` counts as "no fields".
pub fn field_set_from_value(value: Value) -> Result<SerializedFieldSet> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(SerializedFieldSet::new()),
        other => bail!(
            "custom fields must be an object, found {}",
            kind_name(&other)
        ),
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn expect_object(value: &mut Value) -> Result<&mut serde_json::Map<String, Value>> {
    let kind = kind_name(value);
    value
        .as_object_mut()
        .ok_or_else(|| anyhow!("settings document must be an object, found {kind}"))
}
