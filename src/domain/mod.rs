//! Domain layer containing the prediction pipeline's types and rules.
//!
//! # Module Organization
//!
//! - `customer` - Canonical customer record, normalization and validation
//! - `extraction` - Prompt construction and tolerant parsing of model output
//! - `features` - Ordered, typed model input derived from a record
//! - `prediction` - Churn labels and prediction results

pub mod customer;
pub mod extraction;
pub mod features;
pub mod prediction;
