//! Corpus normalization
//!
//! Turns the append-only record stream into the cleaned corpus: text is
//! re-normalized, records outside the success range or below the minimum
//! length are dropped, and duplicate `(doc_id, content_hash)` pairs collapse
//! to their first occurrence. No network access happens here.

mod corpus;

pub use corpus::{corpus_schema, write_corpus};

use crate::extract::normalize_text;
use crate::output::DocumentRecord;
use crate::Result;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Minimum normalized text length, in characters, for a record to be kept
pub const MIN_TEXT_CHARS: usize = 200;

/// Counts from one normalization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Non-blank input lines, malformed ones included
    pub input_rows: usize,
    pub malformed_rows: usize,
    pub dropped_status: usize,
    pub dropped_length: usize,
    pub duplicates: usize,
    pub output_rows: usize,
}

impl NormalizeReport {
    pub fn print(&self) {
        println!("Input rows: {}", self.input_rows);
        println!("Output rows: {}", self.output_rows);
        println!(
            "  dropped: {} malformed, {} by status, {} too short, {} duplicates",
            self.malformed_rows, self.dropped_status, self.dropped_length, self.duplicates
        );
    }
}

/// Reads a JSON Lines record stream
///
/// Blank lines are ignored. Lines that do not parse as a record are counted
/// and skipped.
///
/// # Returns
///
/// * `Ok((records, malformed))` - Parsed records in file order and the malformed line count
/// * `Err(HarvestError)` - The file could not be read
pub fn read_records(path: &Path) -> Result<(Vec<DocumentRecord>, usize)> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    let mut malformed = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<DocumentRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping malformed record on line {}: {}", index + 1, e);
                malformed += 1;
            }
        }
    }

    Ok((records, malformed))
}

/// Filters and deduplicates records, keeping input order
///
/// `report` receives the drop counts; input and output totals are left to
/// the caller.
pub fn clean_records(
    records: Vec<DocumentRecord>,
    report: &mut NormalizeReport,
) -> Vec<DocumentRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut cleaned = Vec::new();

    for mut record in records {
        record.text = normalize_text(&record.text);

        if !(200..300).contains(&record.status_code) {
            report.dropped_status += 1;
            continue;
        }

        if record.text.chars().count() < MIN_TEXT_CHARS {
            report.dropped_length += 1;
            continue;
        }

        if !seen.insert((record.doc_id.clone(), record.content_hash.clone())) {
            report.duplicates += 1;
            continue;
        }

        cleaned.push(record);
    }

    cleaned
}

/// Runs the full normalization job
///
/// # Arguments
///
/// * `input` - The JSON Lines record stream
/// * `output` - Parquet file to create or replace
///
/// # Returns
///
/// * `Ok(NormalizeReport)` - Counts for the run
/// * `Err(HarvestError)` - Reading the input or writing the corpus failed
pub fn run_normalization(input: &Path, output: &Path) -> Result<NormalizeReport> {
    tracing::info!("Normalizing {} -> {}", input.display(), output.display());

    let (records, malformed) = read_records(input)?;
    let mut report = NormalizeReport {
        input_rows: records.len() + malformed,
        malformed_rows: malformed,
        ..NormalizeReport::default()
    };

    let cleaned = clean_records(records, &mut report);
    write_corpus(&cleaned, output)?;
    report.output_rows = cleaned.len();

    tracing::info!(
        "Normalization finished: {} input rows, {} output rows",
        report.input_rows,
        report.output_rows
    );
    Ok(report)
}
