//! Parquet output for the cleaned corpus

use crate::output::DocumentRecord;
use crate::Result;
use arrow_array::{Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use chrono::SecondsFormat;
use parquet::arrow::ArrowWriter;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Column layout of the corpus, mirroring the record stream fields
pub fn corpus_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("doc_id", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("url", DataType::Utf8, false),
        Field::new("fetched_at", DataType::Utf8, false),
        Field::new("status_code", DataType::Int64, false),
        Field::new("content_type", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("published_date", DataType::Utf8, true),
        Field::new("text", DataType::Utf8, false),
        Field::new("content_hash", DataType::Utf8, false),
    ]))
}

/// Writes records to a Parquet file, replacing any previous output
///
/// The file is written next to the destination first and renamed into
/// place, so readers never observe a partial corpus.
pub fn write_corpus(records: &[DocumentRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let batch = build_batch(records)?;
    let tmp_path = temp_path(path);

    let file = File::create(&tmp_path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    fs::rename(&tmp_path, path)?;
    tracing::debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn build_batch(records: &[DocumentRecord]) -> Result<RecordBatch> {
    let fetched_at = StringArray::from(
        records
            .iter()
            .map(|r| r.fetched_at.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            .collect::<Vec<String>>(),
    );
    let status_codes = Int64Array::from(
        records
            .iter()
            .map(|r| i64::from(r.status_code))
            .collect::<Vec<i64>>(),
    );
    let published_dates = StringArray::from(
        records
            .iter()
            .map(|r| r.published_date.map(|d| d.format("%Y-%m-%d").to_string()))
            .collect::<Vec<Option<String>>>(),
    );

    let batch = RecordBatch::try_new(
        corpus_schema(),
        vec![
            Arc::new(string_column(records, |r| r.doc_id.as_str())),
            Arc::new(string_column(records, |r| r.source.as_str())),
            Arc::new(string_column(records, |r| r.url.as_str())),
            Arc::new(fetched_at),
            Arc::new(status_codes),
            Arc::new(string_column(records, |r| r.content_type.as_str())),
            Arc::new(string_column(records, |r| r.title.as_str())),
            Arc::new(published_dates),
            Arc::new(string_column(records, |r| r.text.as_str())),
            Arc::new(string_column(records, |r| r.content_hash.as_str())),
        ],
    )?;

    Ok(batch)
}

fn string_column<'a>(
    records: &'a [DocumentRecord],
    field: impl Fn(&'a DocumentRecord) -> &'a str,
) -> StringArray {
    StringArray::from(records.iter().map(field).collect::<Vec<&str>>())
}

/// Sibling path used while writing, e.g. `.corpus.parquet.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus.parquet".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
