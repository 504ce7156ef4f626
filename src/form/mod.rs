mod convert;
mod error;
mod rows;
mod serialize;

pub use convert::{detect_type, parse, render, value_to_string};
pub use error::{ConversionIssue, SHAPE_ERROR, TypeMismatch};
pub use rows::FieldRows;
pub use serialize::{
    Flattened, ParsedFields, TextValidation, fields_from_set, fields_to_serialized, print_set,
    serialized_to_fields, validate,
};
