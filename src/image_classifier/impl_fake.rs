use crate::error::InferenceError;
use crate::frame::Frame;
use crate::image_classifier::interface::{ClassificationResult, ImageClassifier};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::sync::Arc;

/// Demo model: emits random labels from the waste vocabulary, including a
/// few the taxonomy does not recognize, at random confidence. Lets the full
/// pipeline run without a real model attached.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("classifier:fake"),
        }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(&mut self, _frame: &Frame) -> Result<ClassificationResult, InferenceError> {
        let labels = [
            "Recyclable",
            "Recyclable_item",
            "Non-Recyclable",
            "NonRecyclable",
            "Organic",
            "Compost",
            "Glass",
            "Unknown_object",
        ];

        let mut rng = rand::rng();
        let index_dist = Uniform::new(0, labels.len())
            .map_err(|e| InferenceError::ModelFailure(e.to_string()))?;
        let confidence_dist = Uniform::new(0.0f32, 1.0)
            .map_err(|e| InferenceError::ModelFailure(e.to_string()))?;

        let result = ClassificationResult {
            raw_label: labels[index_dist.sample(&mut rng)].to_string(),
            confidence: confidence_dist.sample(&mut rng),
        };
        let _ = self.logger.info(&format!(
            "classified as {} ({:.2})",
            result.raw_label, result.confidence
        ));
        Ok(result)
    }
}

/// Deterministic model for tests: plays back a fixed script of responses
/// and fails once it runs out.
pub struct ImageClassifierScripted {
    script: VecDeque<Result<ClassificationResult, InferenceError>>,
}

impl ImageClassifierScripted {
    pub fn new(script: Vec<Result<ClassificationResult, InferenceError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl ImageClassifier for ImageClassifierScripted {
    fn classify(&mut self, _frame: &Frame) -> Result<ClassificationResult, InferenceError> {
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::ModelFailure("script exhausted".to_string())))
    }
}
