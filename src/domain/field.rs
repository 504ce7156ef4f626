use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat key to value mapping handed across the settings boundary.
///
/// Backed by `serde_json::Map` with `preserve_order`, so display order follows
/// insertion order while equality ignores it.
pub type SerializedFieldSet = Map<String, Value>;

/// Type attached to every custom field row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
    /// Catch-all for anything that is not a plain scalar (objects, arrays, null).
    Json,
}

impl FieldType {
    pub const ALL: [FieldType; 4] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Json,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Json => "json",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown field type '{}' (expected string, number, boolean or json)",
            self.0
        )
    }
}

impl std::error::Error for UnknownFieldType {}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownFieldType(raw.to_string()))
    }
}

/// One editable row: the value is always kept as text and only becomes a
/// typed value while being flattened.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomField {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub value: String,
}

impl CustomField {
    pub fn new(key: impl Into<String>, kind: FieldType, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            value: value.into(),
        }
    }

    /// A freshly added row: empty key, string type, empty value.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Trimmed key, or `None` when the row does not contribute to the set.
    pub fn effective_key(&self) -> Option<&str> {
        let key = self.key.trim();
        if key.is_empty() { None } else { Some(key) }
    }
}
