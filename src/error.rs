use thiserror::Error;

/// Failures at the capture device boundary.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No capture device responded. The controller retries the open on a
    /// fixed cadence rather than giving up.
    #[error("no capture device responded")]
    Unavailable,
    /// The device produced nothing this tick. Transient: the handle stays
    /// valid and the tick is skipped.
    #[error("no frame available")]
    NoFrame,
}

/// Failures at the opaque model boundary.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model inference failed: {0}")]
    ModelFailure(String),
    /// The loaded model does not produce classification output.
    #[error("model does not produce classifications")]
    NotAClassifier,
}

/// Failures at the persistence boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record log unavailable: {0}")]
    RecordLogUnavailable(String),
    #[error("bin store unavailable: {0}")]
    BinStoreUnavailable(String),
}
