//! Error types for customer record validation.

use std::fmt;
use thiserror::Error;

/// A single constraint violated by one field of a customer record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldViolation {
    #[error("Field '{field}' is required")]
    Missing { field: &'static str },

    #[error("Field '{field}' must be {expected}, got {actual}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' must be at least {min}, got {actual}")]
    BelowMinimum {
        field: &'static str,
        min: f64,
        actual: f64,
    },

    #[error("Field '{field}' must be one of {allowed:?}, got '{actual}'")]
    NotAllowed {
        field: &'static str,
        allowed: &'static [&'static str],
        actual: String,
    },
}

impl FieldViolation {
    /// The record field this violation refers to.
    pub fn field(&self) -> &'static str {
        match self {
            FieldViolation::Missing { field }
            | FieldViolation::WrongType { field, .. }
            | FieldViolation::OutOfRange { field, .. }
            | FieldViolation::BelowMinimum { field, .. }
            | FieldViolation::NotAllowed { field, .. } => field,
        }
    }
}

/// Every constraint a candidate customer record failed.
///
/// Never empty: validation only produces this when at least one field is wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<FieldViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// All violations, in canonical field order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Names of the offending fields.
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(FieldViolation::field).collect()
    }

    /// Returns true if the given field failed validation.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field() == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s): ", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_displays_bounds() {
        let v = FieldViolation::OutOfRange {
            field: "Age",
            min: 18.0,
            max: 100.0,
            actual: 150.0,
        };
        assert_eq!(v.to_string(), "Field 'Age' must be between 18 and 100, got 150");
    }

    #[test]
    fn not_allowed_lists_choices() {
        let v = FieldViolation::NotAllowed {
            field: "Geography",
            allowed: &["Spain", "Germany", "France"],
            actual: "Canada".to_string(),
        };
        assert_eq!(
            v.to_string(),
            r#"Field 'Geography' must be one of ["Spain", "Germany", "France"], got 'Canada'"#
        );
    }

    #[test]
    fn validation_error_enumerates_every_violation() {
        let err = ValidationError::new(vec![
            FieldViolation::Missing { field: "Age" },
            FieldViolation::Missing { field: "Tenure" },
        ]);
        let text = err.to_string();
        assert!(text.starts_with("2 validation error(s)"));
        assert!(text.contains("'Age'"));
        assert!(text.contains("'Tenure'"));
        assert_eq!(err.fields(), vec!["Age", "Tenure"]);
        assert!(err.has_field("Tenure"));
        assert!(!err.has_field("Balance"));
    }
}
