use tracing::debug;

use crate::domain::{CustomField, FieldType, SerializedFieldSet};
use crate::form::{
    ConversionIssue, FieldRows, TextValidation, fields_from_set, fields_to_serialized, print_set,
    serialized_to_fields, validate,
};

use super::options::EditorOptions;
use super::status::StatusLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Form,
    Text,
}

impl EditMode {
    pub fn toggled(self) -> Self {
        match self {
            EditMode::Form => EditMode::Text,
            EditMode::Text => EditMode::Form,
        }
    }
}

/// Result of entering the form view from a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct FormEntry {
    pub fields: Vec<CustomField>,
    pub pending: Vec<ConversionIssue>,
}

/// Text shown when entering the text view from `fields`. Always well-formed.
pub fn enter_text(fields: &[CustomField], pretty: bool) -> String {
    print_set(&fields_to_serialized(fields).set, pretty)
}

/// Rows shown when entering the form view from `text`.
///
/// Clean text replaces the rows; otherwise `last_valid` is kept and the errors
/// become pending warnings.
pub fn enter_form(text: &str, last_valid: &[CustomField]) -> FormEntry {
    let parsed = serialized_to_fields(text);
    if parsed.is_clean() {
        FormEntry {
            fields: parsed.fields,
            pending: Vec::new(),
        }
    } else {
        FormEntry {
            fields: last_valid.to_vec(),
            pending: parsed.errors,
        }
    }
}

/// What the caller gets back on save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    /// `None` when no field survives flattening.
    pub fields: Option<SerializedFieldSet>,
    pub warnings: Vec<ConversionIssue>,
}

/// Form/text editor over one logical field set.
///
/// The row list is authoritative. The text is a mirror in form mode and the
/// user's buffer in text mode; it only reaches the rows after parsing cleanly.
#[derive(Debug, Clone)]
pub struct DualModeEditor {
    mode: EditMode,
    rows: FieldRows,
    text: String,
    pending: Vec<ConversionIssue>,
    warnings: Vec<ConversionIssue>,
    options: EditorOptions,
    status: StatusLine,
}

impl DualModeEditor {
    pub fn open(initial: Option<&SerializedFieldSet>, options: EditorOptions) -> Self {
        let seeded = initial.map(fields_from_set).unwrap_or_default();
        let mut editor = Self {
            mode: EditMode::Form,
            rows: FieldRows::new(seeded.fields),
            text: String::new(),
            pending: seeded.errors,
            warnings: Vec::new(),
            options,
            status: StatusLine::new(),
        };
        editor.mirror_text();
        editor.report_if_issues();
        editor
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn fields(&self) -> &[CustomField] {
        self.rows.fields()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> &str {
        self.status.message()
    }

    /// Pending text errors followed by warnings about the current rows.
    pub fn issues(&self) -> Vec<ConversionIssue> {
        self.pending
            .iter()
            .chain(self.warnings.iter())
            .cloned()
            .collect()
    }

    pub fn has_blocking_issues(&self) -> bool {
        self.pending.iter().any(ConversionIssue::is_blocking)
    }

    /// Syntax-only check of the current text for inline feedback.
    pub fn text_validation(&self) -> TextValidation {
        validate(&self.text)
    }

    /// Index of the last row whose trimmed key equals `key`.
    pub fn find_row(&self, key: &str) -> Option<usize> {
        let key = key.trim();
        self.rows
            .fields()
            .iter()
            .rposition(|field| field.effective_key() == Some(key))
    }

    pub fn toggle_mode(&mut self) -> EditMode {
        match self.mode {
            EditMode::Form => self.switch_to_text(),
            EditMode::Text => self.switch_to_form(),
        }
        self.mode
    }

    pub fn switch_to_text(&mut self) {
        if self.mode == EditMode::Text {
            return;
        }
        self.text = enter_text(self.rows.fields(), self.options.pretty);
        self.pending.clear();
        self.mode = EditMode::Text;
        debug!(rows = self.rows.len(), "switched to text mode");
        self.status.mode_changed(self.mode);
    }

    /// Leave text mode. Never refuses: unparseable text keeps the last valid
    /// rows and is reported through [`issues`](Self::issues).
    pub fn switch_to_form(&mut self) {
        if self.mode == EditMode::Form {
            return;
        }
        let entry = enter_form(&self.text, self.rows.fields());
        if !entry.pending.is_empty() {
            debug!(errors = entry.pending.len(), "text rejected, keeping last valid rows");
        }
        self.rows.replace(entry.fields);
        self.pending = entry.pending;
        self.mode = EditMode::Form;
        self.mirror_text();
        debug!(rows = self.rows.len(), "switched to form mode");
        self.status.mode_changed(self.mode);
        self.report_if_issues();
    }

    /// Replace the text buffer. Only accepted in text mode; clean text updates
    /// the rows immediately, anything else leaves them untouched.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if self.mode != EditMode::Text {
            debug!("text edit ignored outside text mode");
            return false;
        }
        self.text = text.into();
        let parsed = serialized_to_fields(&self.text);
        if parsed.is_clean() {
            self.rows.replace(parsed.fields);
            self.pending.clear();
            self.refresh_warnings();
        } else {
            debug!(errors = parsed.errors.len(), "text edit not reflected in rows");
            self.pending = parsed.errors;
        }
        self.report();
        true
    }

    pub fn add_row(&mut self) -> Option<usize> {
        if !self.form_active() {
            return None;
        }
        let index = self.rows.add_row();
        self.after_row_edit();
        Some(index)
    }

    pub fn remove_row(&mut self, index: usize) -> Option<CustomField> {
        if !self.form_active() {
            return None;
        }
        let removed = self.rows.remove(index)?;
        self.after_row_edit();
        Some(removed)
    }

    pub fn update_row(&mut self, index: usize, field: CustomField) -> bool {
        self.form_active() && self.rows.update(index, field) && self.after_row_edit()
    }

    pub fn set_row_key(&mut self, index: usize, key: &str) -> bool {
        self.form_active() && self.rows.set_key(index, key) && self.after_row_edit()
    }

    pub fn set_row_type(&mut self, index: usize, kind: FieldType) -> bool {
        self.form_active() && self.rows.set_kind(index, kind) && self.after_row_edit()
    }

    pub fn set_row_value(&mut self, index: usize, value: &str) -> bool {
        self.form_active() && self.rows.set_value(index, value) && self.after_row_edit()
    }

    /// Flatten the authoritative rows, whatever the current mode. An
    /// unfinished text edit never reaches the result.
    pub fn save(&mut self) -> SaveOutcome {
        let flattened = fields_to_serialized(self.rows.fields());
        let warnings = self.filter_warnings(flattened.warnings);
        self.status.saved(flattened.set.len());
        let fields = if flattened.set.is_empty() {
            None
        } else {
            Some(flattened.set)
        };
        SaveOutcome { fields, warnings }
    }

    fn form_active(&self) -> bool {
        if self.mode == EditMode::Form {
            true
        } else {
            debug!("row edit ignored outside form mode");
            false
        }
    }

    fn after_row_edit(&mut self) -> bool {
        // The mirrored text now supersedes whatever text produced the pending errors.
        self.pending.clear();
        self.mirror_text();
        self.report();
        true
    }

    fn mirror_text(&mut self) {
        let flattened = fields_to_serialized(self.rows.fields());
        self.text = print_set(&flattened.set, self.options.pretty);
        self.warnings = self.filter_warnings(flattened.warnings);
    }

    fn refresh_warnings(&mut self) {
        let flattened = fields_to_serialized(self.rows.fields());
        self.warnings = self.filter_warnings(flattened.warnings);
    }

    fn filter_warnings(&self, warnings: Vec<ConversionIssue>) -> Vec<ConversionIssue> {
        if self.options.flag_duplicates {
            return warnings;
        }
        warnings
            .into_iter()
            .filter(|issue| !matches!(issue, ConversionIssue::DuplicateKey { .. }))
            .collect()
    }

    fn report(&mut self) {
        let count = self.pending.len() + self.warnings.len();
        if count == 0 {
            self.status.value_updated();
        } else {
            self.status.issues_remaining(count);
        }
    }

    fn report_if_issues(&mut self) {
        let count = self.pending.len() + self.warnings.len();
        if count > 0 {
            self.status.issues_remaining(count);
        }
    }
}
