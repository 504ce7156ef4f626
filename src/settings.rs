//! Bridge between an opaque settings document and the custom field editor.
//!
//! Only the entry named by [`EditorOptions::settings_key`] is read or written;
//! every other setting passes through untouched.

use anyhow::{Result, bail};
use serde_json::Value;

use crate::app::{DualModeEditor, EditorOptions, SaveOutcome};
use crate::domain::SerializedFieldSet;
use crate::form::{ParsedFields, fields_from_set};
use crate::io::{expect_object, kind_name};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSettings {
    set: Option<SerializedFieldSet>,
}

impl FieldSettings {
    pub fn new(set: Option<SerializedFieldSet>) -> Self {
        Self { set }
    }

    /// Read the custom field entry. Missing or `null` means no fields.
    pub fn from_document(document: &Value, options: &EditorOptions) -> Result<Self> {
        let Some(settings) = document.as_object() else {
            bail!(
                "settings document must be an object, found {}",
                kind_name(document)
            );
        };
        match settings.get(&options.settings_key) {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(map)) => Ok(Self::new(Some(map.clone()))),
            Some(other) => bail!(
                "'{}' must be an object, found {}",
                options.settings_key,
                kind_name(other)
            ),
        }
    }

    pub fn field_set(&self) -> Option<&SerializedFieldSet> {
        self.set.as_ref()
    }

    /// Rows the editor opens with.
    pub fn seed_fields(&self) -> ParsedFields {
        self.set.as_ref().map(fields_from_set).unwrap_or_default()
    }

    pub fn open_editor(&self, options: EditorOptions) -> DualModeEditor {
        DualModeEditor::open(self.set.as_ref(), options)
    }
}

/// Write a save result back. An empty result removes the entry instead of
/// storing `{}`.
pub fn apply_saved(
    document: &mut Value,
    saved: &SaveOutcome,
    options: &EditorOptions,
) -> Result<()> {
    let settings = expect_object(document)?;
    match &saved.fields {
        Some(set) => {
            settings.insert(options.settings_key.clone(), Value::Object(set.clone()));
        }
        None => {
            settings.shift_remove(&options.settings_key);
        }
    }
    Ok(())
}
