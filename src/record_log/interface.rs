use crate::error::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One audit row: every classification attempt that produced a scored
/// label lands here, whether or not it moved a bin. Rows are never
/// mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub id: u64,
    pub source_tag: String,
    pub raw_label: String,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

/// What the classification loop hands to the log; ids are assigned by the
/// log itself.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub source_tag: String,
    pub raw_label: String,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

pub trait RecordLog: Send + Sync {
    /// Appends one record, returning its monotonically increasing id.
    /// A failure here never blocks the classification loop: the caller
    /// drops the record with a log message instead of retrying inline.
    fn append(&self, record: NewRecord) -> Result<u64, StorageError>;
}
