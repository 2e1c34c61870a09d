//! Churn Detect - Customer churn prediction from free-form text
//!
//! A language model extracts customer attributes from text, the attributes are
//! validated into a typed record, and a pre-fitted preprocessing + classifier
//! pipeline predicts whether the customer will exit.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
