use crate::error::StorageError;
use crate::record_log::interface::{ClassificationRecord, NewRecord, RecordLog};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory record log for tests; can be switched into an unavailable
/// state to exercise the drop-with-log path.
pub struct RecordLogMemory {
    rows: Mutex<Vec<ClassificationRecord>>,
    unavailable: AtomicBool,
}

impl RecordLogMemory {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<ClassificationRecord> {
        self.rows.lock().unwrap().clone()
    }
}

impl Default for RecordLogMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordLog for RecordLogMemory {
    fn append(&self, record: NewRecord) -> Result<u64, StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::RecordLogUnavailable(
                "log marked unavailable".to_string(),
            ));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as u64 + 1;
        rows.push(ClassificationRecord {
            id,
            source_tag: record.source_tag,
            raw_label: record.raw_label,
            confidence: record.confidence,
            timestamp: record.timestamp,
        });
        Ok(id)
    }
}
