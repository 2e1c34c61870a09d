//! Projection of a validated customer into the model's input vector.
//!
//! The column order and per-column dtype are fixed. A [`FeatureVector`] is
//! built fresh for each prediction and never mutated.

use std::fmt;

use crate::domain::customer::CustomerRecord;

/// Column dtype expected by the preprocessing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    Float,
    Str,
    Int,
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dtype::Float => "float",
            Dtype::Str => "str",
            Dtype::Int => "int",
        };
        f.write_str(s)
    }
}

/// Model input columns, in order.
pub const COLUMNS: [(&str, Dtype); 10] = [
    ("CreditScore", Dtype::Float),
    ("Geography", Dtype::Str),
    ("Gender", Dtype::Str),
    ("Age", Dtype::Int),
    ("Tenure", Dtype::Int),
    ("Balance", Dtype::Float),
    ("NumOfProducts", Dtype::Int),
    ("HasCrCard", Dtype::Int),
    ("IsActiveMember", Dtype::Int),
    ("EstimatedSalary", Dtype::Float),
];

/// A single typed cell of the feature vector.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Float(f64),
    Str(String),
    Int(i64),
}

impl FeatureValue {
    pub fn dtype(&self) -> Dtype {
        match self {
            FeatureValue::Float(_) => Dtype::Float,
            FeatureValue::Str(_) => Dtype::Str,
            FeatureValue::Int(_) => Dtype::Int,
        }
    }

    /// Numeric view of float and int cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Float(v) => write!(f, "{}", v),
            FeatureValue::Str(s) => f.write_str(s),
            FeatureValue::Int(v) => write!(f, "{}", v),
        }
    }
}

/// Ordered, fixed-length, fixed-dtype model input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    /// Builds the vector for a validated record.
    ///
    /// # Panics
    ///
    /// Panics if the produced cells do not match [`COLUMNS`]. That can only
    /// happen if this function and the column table drift apart.
    pub fn from_record(record: &CustomerRecord) -> Self {
        let values = vec![
            FeatureValue::Float(record.credit_score()),
            FeatureValue::Str(record.geography().as_str().to_string()),
            FeatureValue::Str(record.gender().as_str().to_string()),
            FeatureValue::Int(record.age()),
            FeatureValue::Int(record.tenure()),
            FeatureValue::Float(record.balance()),
            FeatureValue::Int(record.num_of_products()),
            FeatureValue::Int(i64::from(record.has_cr_card())),
            FeatureValue::Int(i64::from(record.is_active_member())),
            FeatureValue::Float(record.estimated_salary()),
        ];
        assert_schema(&values);
        Self { values }
    }

    /// Position of a column, if it exists.
    pub fn column_index(column: &str) -> Option<usize> {
        COLUMNS.iter().position(|(name, _)| *name == column)
    }

    /// Value of a named column.
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        Self::column_index(column).map(|i| &self.values[i])
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// (column name, value) pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        COLUMNS.iter().map(|(name, _)| *name).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn assert_schema(values: &[FeatureValue]) {
    assert_eq!(
        values.len(),
        COLUMNS.len(),
        "feature vector has {} cells, expected {}",
        values.len(),
        COLUMNS.len()
    );
    for (value, (name, dtype)) in values.iter().zip(COLUMNS.iter()) {
        assert_eq!(
            value.dtype(),
            *dtype,
            "column '{}' must be {}, got {}",
            name,
            dtype,
            value.dtype()
        );
    }
}
