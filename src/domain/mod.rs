mod field;

pub use field::{CustomField, FieldType, SerializedFieldSet, UnknownFieldType};
