#![deny(rust_2018_idioms)]

mod app;
mod domain;
mod form;
mod io;
mod settings;

pub use app::{
    DEFAULT_SETTINGS_KEY, DualModeEditor, EditMode, EditorOptions, FormEntry, SaveOutcome,
    StatusLine, enter_form, enter_text,
};
pub use domain::{CustomField, FieldType, SerializedFieldSet, UnknownFieldType};
pub use form::{
    ConversionIssue, FieldRows, Flattened, ParsedFields, SHAPE_ERROR, TextValidation,
    TypeMismatch, detect_type, fields_from_set, fields_to_serialized, parse, print_set, render,
    serialized_to_fields, validate, value_to_string,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, field_set_from_value,
    parse_document_any, parse_document_str,
};
pub use settings::{FieldSettings, apply_saved};

pub mod prelude {
    pub use super::{
        ConversionIssue, CustomField, DualModeEditor, EditMode, EditorOptions, FieldSettings,
        FieldType, SerializedFieldSet,
    };
}
