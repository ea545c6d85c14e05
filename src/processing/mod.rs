//! Conversion Pipeline

pub mod processor;
pub mod batch;

pub use processor::{SampleConverter, FileReport};
pub use batch::{collect_inputs, BatchSummary, FailurePolicy};
