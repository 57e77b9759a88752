//! CSV rollup functionality for archiving WAL study records.
//!
//! Implements atomic WAL-to-CSV conversion with proper error handling
//! to prevent data loss.

use crate::{Result, StudyRecord};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    subject_id: String,
    mode: String,
    total_questions: usize,
    correct_answers: usize,
    accuracy_percent: f64,
    grade: String,
    completed_at: String,
}

impl From<&StudyRecord> for CsvRow {
    fn from(record: &StudyRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            subject_id: record.subject_id.to_string(),
            mode: record.mode.clone(),
            total_questions: record.total_questions,
            correct_answers: record.correct_answers,
            accuracy_percent: record.accuracy_percent,
            grade: record.grade.to_string(),
            completed_at: record.completed_at.to_rfc3339(),
        }
    }
}

/// Roll up WAL records into CSV and archive the WAL atomically
///
/// This function:
/// 1. Reads all records from the WAL
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the WAL to .processed
/// 5. Returns the number of records processed
///
/// # Safety
/// - CSV is fsynced before WAL is renamed
/// - WAL is renamed (not deleted) to allow manual recovery if needed
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let records = crate::journal::read_records(wal_path)?;

    if records.is_empty() {
        tracing::info!("No records in WAL to roll up");
        return Ok(0);
    }

    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Open CSV file for appending
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Only the first write carries headers
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for record in &records {
        let row = CsvRow::from(record);
        writer.serialize(row)?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} records to CSV", records.len());

    // Atomically archive the WAL by renaming it
    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;

    tracing::info!("Archived WAL to {:?}", processed_path);

    Ok(records.len())
}

/// Clean up old processed WAL files
///
/// This removes all .wal.processed files in the given directory.
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed WAL: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}
