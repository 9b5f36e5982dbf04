//! Prediction chain: ordered stages, first resolution wins.

use crate::artifacts::ArtifactBundle;
use crate::classifier::Classifier;
use crate::lexicon::LexiconMatcher;
use crate::model::ModelClassifier;
use crate::polarity::PolarityFallback;
use emokit_core::{Emotion, Result, TextNormalizer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Source name reported when every stage abstained.
pub const DEFAULT_SOURCE: &str = "default";

/// Final chain output.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// The predicted emotion
    pub emotion: Emotion,

    /// Name of the stage that resolved the text, or [`DEFAULT_SOURCE`]
    pub source: String,

    /// Per-class probabilities when the resolving stage produced them
    pub probabilities: Option<BTreeMap<String, f64>>,

    /// End-to-end chain latency in microseconds
    pub latency_us: u64,
}

/// Runs stages in order and returns the first resolution. When every stage
/// abstains the prediction is neutral with no probabilities.
pub struct EmotionPredictor {
    stages: Vec<Arc<dyn Classifier>>,
}

impl EmotionPredictor {
    /// Build a predictor over an explicit stage order.
    pub fn new(stages: Vec<Arc<dyn Classifier>>) -> Self {
        Self { stages }
    }

    /// The standard chain: lexicon matcher, polarity fallback, and, when a
    /// trained bundle is available, the model stage.
    pub fn with_defaults(bundle: Option<Arc<ArtifactBundle>>) -> Result<Self> {
        let mut stages: Vec<Arc<dyn Classifier>> = vec![
            Arc::new(LexiconMatcher::new(TextNormalizer::new())?),
            Arc::new(PolarityFallback::new()),
        ];
        if let Some(bundle) = bundle {
            stages.push(Arc::new(ModelClassifier::new(bundle)));
        }
        Ok(Self { stages })
    }

    /// Names of the configured stages, in order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Classify one text through the chain.
    pub async fn predict(&self, text: &str) -> Result<Prediction> {
        let start = Instant::now();

        for stage in &self.stages {
            if let Some(detection) = stage.classify(text).await? {
                debug!(stage = stage.name(), emotion = %detection.emotion, "stage resolved");
                return Ok(Prediction {
                    emotion: detection.emotion,
                    source: stage.name().to_string(),
                    probabilities: detection.probabilities,
                    latency_us: start.elapsed().as_micros() as u64,
                });
            }
        }

        Ok(Prediction {
            emotion: Emotion::Neutral,
            source: DEFAULT_SOURCE.to_string(),
            probabilities: None,
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    /// Classify a batch of texts in order.
    pub async fn predict_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Prediction>> {
        let mut predictions = Vec::with_capacity(texts.len());
        for text in texts {
            predictions.push(self.predict(text.as_ref()).await?);
        }
        Ok(predictions)
    }
}
