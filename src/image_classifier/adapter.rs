use crate::error::InferenceError;
use crate::frame::Frame;
use crate::image_classifier::interface::{ClassificationResult, ImageClassifier};
use std::sync::Mutex;

/// Serializes access to the model: at most one `classify` call is in
/// flight system-wide. The lock is scoped to the call and released on
/// every exit path; callers must not hold it across unrelated work.
pub struct ClassifierAdapter {
    model: Mutex<Box<dyn ImageClassifier>>,
}

impl ClassifierAdapter {
    pub fn new(model: Box<dyn ImageClassifier>) -> Self {
        Self {
            model: Mutex::new(model),
        }
    }

    pub fn classify(&self, frame: &Frame) -> Result<ClassificationResult, InferenceError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| InferenceError::ModelFailure("classifier lock poisoned".to_string()))?;
        model.classify(frame)
    }
}
