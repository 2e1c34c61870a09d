//! Customer schema and validation.
//!
//! Defines the canonical customer shape used throughout the pipeline and the
//! single place where raw field mappings become typed records.

mod errors;
mod record;

pub use errors::{FieldViolation, ValidationError};
pub use record::{
    capitalize, title_case, CustomerRecord, Gender, Geography, RawFields, FIELD_NAMES,
};
