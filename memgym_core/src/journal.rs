//! Write-Ahead Log (WAL) for study record persistence.
//!
//! Completed sessions are appended to a JSONL (JSON Lines) file with
//! file locking to ensure safe concurrent access.

use crate::{Result, StudyRecord};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Record sink trait for persisting completed session results
pub trait RecordSink {
    fn append(&mut self, record: &StudyRecord) -> Result<()>;
}

/// JSONL-based record sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl RecordSink for JsonlSink {
    fn append(&mut self, record: &StudyRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        // Open file for appending
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        // Write record as JSON line
        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended study record {} to WAL", record.id);
        Ok(())
    }
}

/// Read all study records from a WAL file
pub fn read_records(path: &Path) -> Result<Vec<StudyRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<StudyRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from WAL", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionResult;
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_record() -> StudyRecord {
        StudyRecord::from_result(Uuid::new_v4(), "due", &SessionResult::new(5, 4), Utc::now())
    }

    #[test]
    fn test_append_and_read_single_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let record = create_test_record();
        let record_id = record.id;

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&record).unwrap();

        let records = read_records(&wal_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, record_id);
        assert_eq!(records[0].correct_answers, 4);
    }

    #[test]
    fn test_append_multiple_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let mut sink = JsonlSink::new(&wal_path);
        for _ in 0..5 {
            sink.append(&create_test_record()).unwrap();
        }

        let records = read_records(&wal_path).unwrap();
        assert_eq!(records.len(), 5);
    }

    #[test]
    fn test_read_empty_wal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = read_records(&temp_dir.path().join("nonexistent.wal")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_corrupt_line_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&create_test_record()).unwrap();

        // Inject a corrupt line, then append another good one
        {
            let mut file = OpenOptions::new().append(true).open(&wal_path).unwrap();
            writeln!(file, "{{ not json").unwrap();
        }
        sink.append(&create_test_record()).unwrap();

        let records = read_records(&wal_path).unwrap();
        assert_eq!(records.len(), 2);
    }
}
