use crate::error::InferenceError;
use crate::frame::Frame;

/// One scored label from the model, prior to normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub raw_label: String,
    pub confidence: f32,
}

/// The opaque model boundary. A call may take hundreds of milliseconds and
/// the underlying model is not reentrant, which `&mut self` makes explicit;
/// callers go through `ClassifierAdapter` rather than holding a model
/// directly.
pub trait ImageClassifier: Send {
    fn classify(&mut self, frame: &Frame) -> Result<ClassificationResult, InferenceError>;
}
