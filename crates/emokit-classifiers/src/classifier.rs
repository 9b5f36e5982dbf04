//! Classifier trait and common types

use async_trait::async_trait;
use emokit_core::{Emotion, Result};
use std::collections::BTreeMap;

/// Trait for all prediction stages.
///
/// A stage either resolves a text to a [`Detection`] or abstains with
/// `Ok(None)`, deferring to the next stage in the chain. Errors are reserved
/// for broken configuration (for example a model stage without loaded
/// artifacts), never for well-formed text input.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text, or abstain.
    async fn classify(&self, text: &str) -> Result<Option<Detection>>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// A resolved classification from a single stage.
#[derive(Debug, Clone)]
pub struct Detection {
    /// The predicted emotion
    pub emotion: Emotion,

    /// Per-class probabilities, when the stage can produce them
    /// (only the model stage does)
    pub probabilities: Option<BTreeMap<String, f64>>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl Detection {
    /// Create a detection with no probability estimates.
    pub fn new(emotion: Emotion) -> Self {
        Self {
            emotion,
            probabilities: None,
            latency_us: 0,
        }
    }

    /// Attach per-class probabilities.
    pub fn with_probabilities(mut self, probabilities: BTreeMap<String, f64>) -> Self {
        self.probabilities = Some(probabilities);
        self
    }

    /// Attach the measured stage latency.
    pub fn with_latency_us(mut self, latency_us: u64) -> Self {
        self.latency_us = latency_us;
        self
    }
}
