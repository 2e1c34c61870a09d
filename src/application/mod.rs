//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod errors;
pub mod handlers;

pub use errors::PredictionError;
pub use handlers::{
    BatchLimits, ExtractCustomerCommand, ExtractCustomerHandler, ExtractionSettings,
    PredictBatchCommand, PredictChurnHandler, PredictFromRecordCommand, PredictFromTextCommand,
    PredictFromTextHandler,
};
