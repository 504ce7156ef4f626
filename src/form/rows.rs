use crate::domain::{CustomField, FieldType};

use super::convert::{parse, render};

/// Row list backing the form view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRows {
    entries: Vec<CustomField>,
}

impl FieldRows {
    pub fn new(entries: Vec<CustomField>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fields(&self) -> &[CustomField] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CustomField> {
        self.entries.get(index)
    }

    pub fn replace(&mut self, entries: Vec<CustomField>) {
        self.entries = entries;
    }

    /// Append a blank row and return its index.
    pub fn add_row(&mut self) -> usize {
        self.entries.push(CustomField::blank());
        self.entries.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<CustomField> {
        if index >= self.entries.len() {
            return None;
        }
        Some(self.entries.remove(index))
    }

    pub fn update(&mut self, index: usize, field: CustomField) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if *entry != field => {
                *entry = field;
                true
            }
            _ => false,
        }
    }

    pub fn set_key(&mut self, index: usize, key: &str) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if entry.key != key => {
                entry.key = key.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_value(&mut self, index: usize, value: &str) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if entry.value != value => {
                entry.value = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Change a row's type. The text is re-rendered in canonical form when it
    /// parses under the new type and left exactly as typed otherwise.
    pub fn set_kind(&mut self, index: usize, kind: FieldType) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        if entry.kind == kind {
            return false;
        }
        if let Ok(text) = parse(kind, &entry.value).and_then(|value| render(kind, &value)) {
            entry.value = text;
        }
        entry.kind = kind;
        true
    }
}
