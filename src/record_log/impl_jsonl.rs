use crate::error::StorageError;
use crate::record_log::interface::{ClassificationRecord, NewRecord, RecordLog};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;

struct LogInner {
    file: File,
    next_id: u64,
}

/// Append-only record log, one JSON object per line. Ids keep increasing
/// across restarts: the highest id already in the file is recovered on
/// open.
pub struct RecordLogJsonl {
    inner: Mutex<LogInner>,
}

impl RecordLogJsonl {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let mut next_id = 1;
        if path.exists() {
            let existing = File::open(&path)
                .map_err(|e| StorageError::RecordLogUnavailable(e.to_string()))?;
            for line in BufReader::new(existing).lines() {
                let line = line.map_err(|e| StorageError::RecordLogUnavailable(e.to_string()))?;
                if let Ok(record) = serde_json::from_str::<ClassificationRecord>(&line) {
                    next_id = next_id.max(record.id + 1);
                }
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StorageError::RecordLogUnavailable(e.to_string()))?;

        Ok(Self {
            inner: Mutex::new(LogInner { file, next_id }),
        })
    }
}

impl RecordLog for RecordLogJsonl {
    fn append(&self, record: NewRecord) -> Result<u64, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;

        let row = ClassificationRecord {
            id,
            source_tag: record.source_tag,
            raw_label: record.raw_label,
            confidence: record.confidence,
            timestamp: record.timestamp,
        };
        let line = serde_json::to_string(&row)
            .map_err(|e| StorageError::RecordLogUnavailable(e.to_string()))?;
        writeln!(inner.file, "{}", line)
            .map_err(|e| StorageError::RecordLogUnavailable(e.to_string()))?;
        inner
            .file
            .flush()
            .map_err(|e| StorageError::RecordLogUnavailable(e.to_string()))?;

        inner.next_id += 1;
        Ok(id)
    }
}

#[cfg(test)]
mod record_log_jsonl_test {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};

    static NEXT_LOG: AtomicU32 = AtomicU32::new(0);

    fn log_path() -> PathBuf {
        let unique = NEXT_LOG.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "sortyx_records_test_{}_{}.jsonl",
            std::process::id(),
            unique
        ))
    }

    fn record(label: &str, confidence: f32) -> NewRecord {
        NewRecord {
            source_tag: "camera:test".to_string(),
            raw_label: label.to_string(),
            confidence,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let path = log_path();
        let log = RecordLogJsonl::open(&path).unwrap();

        assert_eq!(log.append(record("Recyclable_item", 0.85)).unwrap(), 1);
        assert_eq!(log.append(record("Glass", 0.95)).unwrap(), 2);
        assert_eq!(log.append(record("Organic", 0.50)).unwrap(), 3);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_ids_keep_increasing_across_reopen() {
        let path = log_path();
        {
            let log = RecordLogJsonl::open(&path).unwrap();
            log.append(record("Organic", 0.9)).unwrap();
            log.append(record("Compost", 0.8)).unwrap();
        }
        let reopened = RecordLogJsonl::open(&path).unwrap();
        assert_eq!(reopened.append(record("Recyclable", 0.7)).unwrap(), 3);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_rows_round_trip_through_the_file() {
        let path = log_path();
        let log = RecordLogJsonl::open(&path).unwrap();
        log.append(record("Recyclable_item", 0.85)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let row: ClassificationRecord = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
        assert_eq!(row.id, 1);
        assert_eq!(row.raw_label, "Recyclable_item");
        assert_eq!(row.source_tag, "camera:test");
        let _ = std::fs::remove_file(path);
    }
}
