//! The canonical customer record and its validating constructor.
//!
//! A [`CustomerRecord`] can only be obtained through [`CustomerRecord::validate`],
//! which normalizes free-text fields, coerces loosely-typed values and checks every
//! constraint in one pass. Either all ten fields pass or a [`ValidationError`]
//! listing every violation is returned; partial records never exist.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::errors::{FieldViolation, ValidationError};

/// Loosely-typed field mapping as produced by the extractor or a request body.
pub type RawFields = Map<String, Value>;

/// Canonical field names, in feature-column order.
pub const FIELD_NAMES: [&str; 10] = [
    "CreditScore",
    "Geography",
    "Gender",
    "Age",
    "Tenure",
    "Balance",
    "NumOfProducts",
    "HasCrCard",
    "IsActiveMember",
    "EstimatedSalary",
];

/// Country of residence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Geography {
    Spain,
    Germany,
    France,
}

impl Geography {
    pub const ALLOWED: &'static [&'static str] = &["Spain", "Germany", "France"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Geography::Spain => "Spain",
            Geography::Germany => "Germany",
            Geography::France => "France",
        }
    }

    /// Parses an already-normalized value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Spain" => Some(Geography::Spain),
            "Germany" => Some(Geography::Germany),
            "France" => Some(Geography::France),
            _ => None,
        }
    }
}

impl fmt::Display for Geography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALLOWED: &'static [&'static str] = &["Male", "Female"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Parses an already-normalized value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Title-cases every word: a letter following a non-letter is uppercased,
/// every other letter lowercased ("united KINGDOM" -> "United Kingdom").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Uppercases the first character and lowercases the rest ("fEMALE" -> "Female").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// A validated, canonicalized customer.
///
/// Serializes with the canonical PascalCase field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerRecord {
    credit_score: f64,
    geography: Geography,
    gender: Gender,
    age: i64,
    tenure: i64,
    balance: f64,
    num_of_products: i64,
    has_cr_card: u8,
    is_active_member: u8,
    estimated_salary: f64,
}

impl CustomerRecord {
    /// Normalizes, coerces and validates a raw field mapping.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] enumerating every missing, wrongly-typed,
    /// out-of-range or disallowed field.
    pub fn validate(raw: &RawFields) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(raw);

        let credit_score = reader.float_in("CreditScore", 300.0, 900.0);
        let geography = reader.choice("Geography", title_case, Geography::parse, Geography::ALLOWED);
        let gender = reader.choice("Gender", capitalize, Gender::parse, Gender::ALLOWED);
        let age = reader.int_in("Age", 18, 100);
        let tenure = reader.int_in("Tenure", 0, 10);
        let balance = reader.float_at_least("Balance", 0.0);
        let num_of_products = reader.int_in("NumOfProducts", 1, 4);
        let has_cr_card = reader.flag("HasCrCard");
        let is_active_member = reader.flag("IsActiveMember");
        let estimated_salary = reader.float_at_least("EstimatedSalary", 0.0);

        if !reader.violations.is_empty() {
            return Err(ValidationError::new(reader.violations));
        }

        let (
            Some(credit_score),
            Some(geography),
            Some(gender),
            Some(age),
            Some(tenure),
            Some(balance),
            Some(num_of_products),
            Some(has_cr_card),
            Some(is_active_member),
            Some(estimated_salary),
        ) = (
            credit_score,
            geography,
            gender,
            age,
            tenure,
            balance,
            num_of_products,
            has_cr_card,
            is_active_member,
            estimated_salary,
        )
        else {
            // Every None above pushed a violation, so this is unreachable in practice.
            return Err(ValidationError::new(reader.violations));
        };

        Ok(Self {
            credit_score,
            geography,
            gender,
            age,
            tenure,
            balance,
            num_of_products,
            has_cr_card,
            is_active_member,
            estimated_salary,
        })
    }

    pub fn credit_score(&self) -> f64 {
        self.credit_score
    }

    pub fn geography(&self) -> Geography {
        self.geography
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn tenure(&self) -> i64 {
        self.tenure
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn num_of_products(&self) -> i64 {
        self.num_of_products
    }

    /// 1 if the customer holds a credit card, else 0.
    pub fn has_cr_card(&self) -> u8 {
        self.has_cr_card
    }

    /// 1 if the customer is an active member, else 0.
    pub fn is_active_member(&self) -> u8 {
        self.is_active_member
    }

    pub fn estimated_salary(&self) -> f64 {
        self.estimated_salary
    }
}

impl TryFrom<&RawFields> for CustomerRecord {
    type Error = ValidationError;

    fn try_from(raw: &RawFields) -> Result<Self, Self::Error> {
        Self::validate(raw)
    }
}

/// Reads fields out of a raw mapping, accumulating violations instead of
/// stopping at the first one.
struct FieldReader<'a> {
    raw: &'a RawFields,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    fn new(raw: &'a RawFields) -> Self {
        Self {
            raw,
            violations: Vec::new(),
        }
    }

    fn present(&mut self, field: &'static str) -> Option<&'a Value> {
        match self.raw.get(field) {
            Some(Value::Null) | None => {
                self.violations.push(FieldViolation::Missing { field });
                None
            }
            Some(value) => Some(value),
        }
    }

    fn wrong_type(&mut self, field: &'static str, expected: &'static str, actual: &Value) {
        self.violations.push(FieldViolation::WrongType {
            field,
            expected,
            actual: actual.to_string(),
        });
    }

    fn float(&mut self, field: &'static str) -> Option<f64> {
        let value = self.present(field)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        };
        if parsed.is_none() {
            self.wrong_type(field, "a number", value);
        }
        parsed
    }

    fn float_in(&mut self, field: &'static str, min: f64, max: f64) -> Option<f64> {
        let value = self.float(field)?;
        if value < min || value > max {
            self.violations.push(FieldViolation::OutOfRange {
                field,
                min,
                max,
                actual: value,
            });
            return None;
        }
        Some(value)
    }

    fn float_at_least(&mut self, field: &'static str, min: f64) -> Option<f64> {
        let value = self.float(field)?;
        if value < min {
            self.violations.push(FieldViolation::BelowMinimum {
                field,
                min,
                actual: value,
            });
            return None;
        }
        Some(value)
    }

    /// Whole-number reading of `value`. Kept as `f64` so values beyond `i64`
    /// are still range-checked rather than reported as the wrong type.
    fn whole_number(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        (number.is_finite() && number.fract() == 0.0).then_some(number)
    }

    fn int_in(&mut self, field: &'static str, min: i64, max: i64) -> Option<i64> {
        let value = self.present(field)?;
        let Some(parsed) = Self::whole_number(value) else {
            self.wrong_type(field, "an integer", value);
            return None;
        };
        let (min, max) = (min as f64, max as f64);
        if parsed < min || parsed > max {
            self.violations.push(FieldViolation::OutOfRange {
                field,
                min,
                max,
                actual: parsed,
            });
            return None;
        }
        Some(parsed as i64)
    }

    /// Booleans from the extractor are canonicalized to 0/1 here.
    fn flag(&mut self, field: &'static str) -> Option<u8> {
        let value = self.present(field)?;
        let parsed = match value {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            other => Self::whole_number(other),
        };
        let Some(parsed) = parsed else {
            self.wrong_type(field, "a boolean or 0/1", value);
            return None;
        };
        if parsed == 0.0 {
            Some(0)
        } else if parsed == 1.0 {
            Some(1)
        } else {
            self.violations.push(FieldViolation::OutOfRange {
                field,
                min: 0.0,
                max: 1.0,
                actual: parsed,
            });
            None
        }
    }

    fn choice<T>(
        &mut self,
        field: &'static str,
        normalize: fn(&str) -> String,
        parse: fn(&str) -> Option<T>,
        allowed: &'static [&'static str],
    ) -> Option<T> {
        let value = self.present(field)?;
        let Value::String(s) = value else {
            self.wrong_type(field, "a string", value);
            return None;
        };
        let normalized = normalize(s.trim());
        let parsed = parse(&normalized);
        if parsed.is_none() {
            self.violations.push(FieldViolation::NotAllowed {
                field,
                allowed,
                actual: normalized,
            });
        }
        parsed
    }
}
