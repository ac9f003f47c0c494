//! Record sink trait and output errors

use crate::output::DocumentRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for document records
///
/// Implementations must make each emitted record durable before returning,
/// so an interrupted run leaves only complete records behind.
pub trait RecordSink {
    /// Appends one record
    ///
    /// # Arguments
    ///
    /// * `record` - The record to append
    fn emit(&mut self, record: &DocumentRecord) -> OutputResult<()>;

    /// Number of records emitted through this sink
    fn emitted(&self) -> usize;
}
