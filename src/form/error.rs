use std::fmt;

use crate::domain::FieldType;

pub const SHAPE_ERROR: &str = "JSON must be an object (not an array or primitive)";

/// Text that does not parse under the declared field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: FieldType,
    pub message: String,
}

impl TypeMismatch {
    pub(crate) fn new(expected: FieldType, message: impl Into<String>) -> Self {
        Self {
            expected,
            message: message.into(),
        }
    }
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}: {}", self.expected, self.message)
    }
}

impl std::error::Error for TypeMismatch {}

/// Advisory problem found while converting between rows and text.
///
/// None of these abort a conversion; each one travels next to the best-effort
/// result it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionIssue {
    /// The raw text is not well-formed JSON.
    Syntax { message: String },
    /// Well-formed JSON whose top level is not an object.
    Shape,
    /// A row's value failed to parse under its type and was kept as a string.
    FieldTypeMismatch { key: String, error: TypeMismatch },
    /// A parsed value could not be rendered into an editable row.
    FieldConversion { key: String, message: String },
    /// Several rows share a key; the last one wins.
    DuplicateKey { key: String, occurrences: usize },
}

impl ConversionIssue {
    pub fn key(&self) -> Option<&str> {
        match self {
            ConversionIssue::Syntax { .. } | ConversionIssue::Shape => None,
            ConversionIssue::FieldTypeMismatch { key, .. }
            | ConversionIssue::FieldConversion { key, .. }
            | ConversionIssue::DuplicateKey { key, .. } => Some(key),
        }
    }

    /// Whether the issue prevents the text from replacing the row list.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            ConversionIssue::Syntax { .. } | ConversionIssue::Shape
        )
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionIssue::Syntax { message } => write!(f, "invalid JSON: {message}"),
            ConversionIssue::Shape => f.write_str(SHAPE_ERROR),
            ConversionIssue::FieldTypeMismatch { key, error } => {
                write!(f, "field \"{key}\": {error}; stored as string")
            }
            ConversionIssue::FieldConversion { key, message } => {
                write!(f, "failed to convert field \"{key}\": {message}")
            }
            ConversionIssue::DuplicateKey { key, occurrences } => write!(
                f,
                "duplicate key \"{key}\" appears {occurrences} times; the last value wins"
            ),
        }
    }
}

impl std::error::Error for ConversionIssue {}
