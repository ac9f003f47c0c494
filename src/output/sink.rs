//! Record sink implementations

use crate::output::{DocumentRecord, OutputResult, RecordSink};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Append-only JSON Lines file
///
/// Each record is serialized to one buffer and written with a single
/// `write_all`, then flushed and synced to disk.
#[derive(Debug)]
pub struct JsonlSink {
    file: File,
    emitted: usize,
}

impl JsonlSink {
    /// Opens (or creates) the record stream for appending
    ///
    /// Missing parent directories are created. Existing records are kept.
    pub fn open(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!("Appending records to {}", path.display());

        Ok(Self {
            file,
            emitted: 0,
        })
    }
}

impl RecordSink for JsonlSink {
    fn emit(&mut self, record: &DocumentRecord) -> OutputResult<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        self.file.write_all(&line)?;
        self.file.flush()?;
        self.file.sync_data()?;

        self.emitted += 1;
        Ok(())
    }

    fn emitted(&self) -> usize {
        self.emitted
    }
}

/// In-memory sink, used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<DocumentRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn emit(&mut self, record: &DocumentRecord) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn emitted(&self) -> usize {
        self.records.len()
    }
}
