//! Study history loading.
//!
//! Loads recent study records from both the WAL and the archived CSV so
//! the CLI can show past session results from either location.

use crate::{Grade, Result, StudyRecord};
use chrono::{DateTime, Duration, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// CSV row format for reading archived records
#[derive(Debug, Deserialize)]
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

impl TryFrom<CsvRow> for StudyRecord {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;
        let subject_id = Uuid::parse_str(&row.subject_id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let completed_at = DateTime::parse_from_rfc3339(&row.completed_at)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        let grade: Grade = row.grade.parse()?;

        Ok(StudyRecord {
            id,
            subject_id,
            mode: row.mode,
            total_questions: row.total_questions,
            correct_answers: row.correct_answers,
            accuracy_percent: row.accuracy_percent,
            grade,
            completed_at,
        })
    }
}

/// Load study records from the last N days from both WAL and CSV
///
/// Returns records sorted by completed_at (newest first).
/// Automatically deduplicates records that appear in both WAL and CSV.
pub fn load_recent_records(
    wal_path: &Path,
    csv_path: &Path,
    days: i64,
) -> Result<Vec<StudyRecord>> {
    let cutoff = Utc::now() - Duration::days(days);
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    // Load from WAL first (most recent)
    if wal_path.exists() {
        let wal_records = crate::journal::read_records(wal_path)?;
        for record in wal_records {
            if record.completed_at >= cutoff {
                seen_ids.insert(record.id);
                records.push(record);
            }
        }
        tracing::debug!("Loaded {} records from WAL", records.len());
    }

    // Load from CSV (archived)
    if csv_path.exists() {
        let csv_records = load_records_from_csv(csv_path)?;
        let mut csv_count = 0;
        for record in csv_records {
            if record.completed_at >= cutoff && !seen_ids.contains(&record.id) {
                seen_ids.insert(record.id);
                records.push(record);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} records from CSV", csv_count);
    }

    // Sort by completed_at, newest first
    records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    tracing::info!(
        "Loaded {} total records from last {} days",
        records.len(),
        days
    );

    Ok(records)
}

/// Load all records from a CSV file
fn load_records_from_csv(path: &Path) -> Result<Vec<StudyRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match StudyRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                    // Continue processing other rows
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(records)
}
