mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{field_set_from_value, parse_document_any, parse_document_str};
pub(crate) use input::{expect_object, kind_name};
pub use output::{OutputDestination, OutputOptions, emit};
