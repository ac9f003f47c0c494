//! Output module for the record stream and crawl reports
//!
//! This module handles:
//! - The `DocumentRecord` schema shared with the normalization job
//! - Durable, append-only record sinks
//! - Optional raw HTML/PDF persistence
//! - Per-source and per-run crawl reports

mod raw;
mod record;
mod sink;
pub mod stats;
mod traits;

pub use raw::{RawKind, RawStore};
pub use record::DocumentRecord;
pub use sink::{JsonlSink, MemorySink};
pub use stats::{print_report, HarvestReport, ListAbort, ListAbortReason, SourceReport};
pub use traits::{OutputError, OutputResult, RecordSink};
