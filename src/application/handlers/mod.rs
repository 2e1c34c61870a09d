//! Application handlers.
//!
//! ## Commands
//! - `ExtractCustomer` - Free text to a validated customer record (one LLM call)
//! - `PredictFromText` - Extraction followed by prediction, with or without probability
//! - `PredictBatch` - Order-preserving batch of the above, failing as a whole
//! - `PredictFromRecord` - Validation followed by prediction for structured input
//!
//! `PredictChurnHandler` is the synchronous inference stage shared by all of them.

mod extract_customer;
mod predict_churn;
mod predict_from_text;

pub use extract_customer::{ExtractCustomerCommand, ExtractCustomerHandler, ExtractionSettings};
pub use predict_churn::PredictChurnHandler;
pub use predict_from_text::{
    BatchLimits, PredictBatchCommand, PredictFromRecordCommand, PredictFromTextCommand,
    PredictFromTextHandler,
};
