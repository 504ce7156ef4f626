use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::domain::{CustomField, FieldType, SerializedFieldSet};

use super::convert::{detect_type, parse, render, value_to_string};
use super::error::{ConversionIssue, TypeMismatch};

/// Rows flattened into a field set, with the warnings collected on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub set: SerializedFieldSet,
    pub warnings: Vec<ConversionIssue>,
}

/// Rows recovered from text. `errors` never aborts the conversion: blocking
/// errors come with an empty row list, per-key errors with a fallback row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFields {
    pub fields: Vec<CustomField>,
    pub errors: Vec<ConversionIssue>,
}

impl ParsedFields {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn failed(issue: ConversionIssue) -> Self {
        Self {
            fields: Vec::new(),
            errors: vec![issue],
        }
    }
}

/// Syntax-only verdict used for inline feedback while text is being typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextValidation {
    pub valid: bool,
    pub error: Option<String>,
}

/// Flatten rows into a field set. Rows without a key are skipped, rows whose
/// text does not parse under their type are stored as strings, and later rows
/// overwrite earlier rows with the same key.
pub fn fields_to_serialized(fields: &[CustomField]) -> Flattened {
    let mut occurrences: IndexMap<&str, usize> = IndexMap::new();
    let mut flattened = fields
        .iter()
        .filter_map(|field| field.effective_key().map(|key| (key, field)))
        .map(|(key, field)| (key, field, parse(field.kind, &field.value)))
        .fold(Flattened::default(), |mut acc, (key, field, parsed)| {
            *occurrences.entry(key).or_default() += 1;
            let value = match parsed {
                Ok(value) => value,
                Err(error) => {
                    warn!(key, %error, "custom field kept as string");
                    acc.warnings.push(ConversionIssue::FieldTypeMismatch {
                        key: key.to_string(),
                        error,
                    });
                    Value::String(field.value.clone())
                }
            };
            acc.set.insert(key.to_string(), value);
            acc
        });

    for (key, count) in occurrences {
        if count > 1 {
            warn!(key, count, "duplicate custom field key, last value wins");
            flattened.warnings.push(ConversionIssue::DuplicateKey {
                key: key.to_string(),
                occurrences: count,
            });
        }
    }
    flattened
}

/// Turn editor text into rows.
pub fn serialized_to_fields(text: &str) -> ParsedFields {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedFields::default();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => fields_from_set(&map),
        Ok(_) => ParsedFields::failed(ConversionIssue::Shape),
        Err(err) => ParsedFields::failed(ConversionIssue::Syntax {
            message: err.to_string(),
        }),
    }
}

/// Seed rows from an already-parsed field set, one row per key.
pub fn fields_from_set(set: &SerializedFieldSet) -> ParsedFields {
    let mut parsed = ParsedFields::default();
    for (key, value) in set {
        match row_for(key, value) {
            Ok(field) => parsed.fields.push(field),
            Err(error) => {
                parsed.errors.push(ConversionIssue::FieldConversion {
                    key: key.clone(),
                    message: error.to_string(),
                });
                parsed
                    .fields
                    .push(CustomField::new(key, FieldType::String, value_to_string(value)));
            }
        }
    }
    parsed
}

/// Whitespace-only text is valid; anything else must be well-formed JSON.
/// The object-shape check is left to [`serialized_to_fields`].
pub fn validate(text: &str) -> TextValidation {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return TextValidation {
            valid: true,
            error: None,
        };
    }
    match serde_json::from_str::<serde::de::IgnoredAny>(trimmed) {
        Ok(_) => TextValidation {
            valid: true,
            error: None,
        },
        Err(err) => TextValidation {
            valid: false,
            error: Some(err.to_string()),
        },
    }
}

/// Text form of a field set as shown in the text view.
pub fn print_set(set: &SerializedFieldSet, pretty: bool) -> String {
    let value = Value::Object(set.clone());
    if pretty {
        format!("{value:#}")
    } else {
        value.to_string()
    }
}

fn row_for(key: &str, value: &Value) -> Result<CustomField, TypeMismatch> {
    let kind = detect_type(value);
    let text = render(kind, value)?;
    Ok(CustomField::new(key, kind, text))
}
