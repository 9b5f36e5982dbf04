//! Trained-model stage: TF-IDF features into the linear classifier.

use crate::artifacts::ArtifactBundle;
use crate::classifier::{Classifier, Detection};
use async_trait::async_trait;
use emokit_core::{Emotion, Error, Result, TextNormalizer};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

/// Last pipeline stage. Unlike the rule stages it never abstains: every
/// input gets a label and a full probability distribution.
pub struct ModelClassifier {
    name: String,
    bundle: Arc<ArtifactBundle>,
    normalizer: TextNormalizer,
}

impl ModelClassifier {
    pub fn new(bundle: Arc<ArtifactBundle>) -> Self {
        Self {
            name: "model".to_string(),
            bundle,
            normalizer: TextNormalizer::new(),
        }
    }

    /// Classify one text, returning the label and per-class probabilities
    /// rounded to four decimal places.
    pub fn predict(&self, raw: &str) -> Result<(Emotion, BTreeMap<String, f64>)> {
        let cleaned = self.normalizer.normalize(raw);
        let row = self.bundle.vectorizer.transform_one(&cleaned);
        let probs = self.bundle.model.predict_proba_one(&row)?;

        let (best_idx, _) = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| Error::not_ready("model produced no class probabilities"))?;

        let label = self.bundle.encoder.inverse_transform(best_idx)?;
        let emotion = Emotion::from_str(label)
            .map_err(|_| Error::classifier(format!("model emitted unknown label {label:?}")))?;

        let mut distribution = BTreeMap::new();
        for (idx, &p) in probs.iter().enumerate() {
            let class = self.bundle.encoder.inverse_transform(idx)?;
            distribution.insert(class.to_string(), (p * 10_000.0).round() / 10_000.0);
        }
        Ok((emotion, distribution))
    }
}

#[async_trait]
impl Classifier for ModelClassifier {
    async fn classify(&self, text: &str) -> Result<Option<Detection>> {
        let start = Instant::now();
        let (emotion, distribution) = self.predict(text)?;
        Ok(Some(
            Detection::new(emotion)
                .with_probabilities(distribution)
                .with_latency_us(start.elapsed().as_micros() as u64),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::LabelEncoder;
    use crate::linear::LinearClassifier;
    use crate::vectorizer::TfidfVectorizer;

    fn trained_bundle() -> Arc<ArtifactBundle> {
        let docs = [
            "feeling cheerful delighted",
            "cheerful delighted smile",
            "mourning gloomy tears",
            "gloomy tears crying",
        ];
        let labels = ["joy", "joy", "sadness", "sadness"];

        let mut vectorizer = TfidfVectorizer::new(200);
        let rows = vectorizer.fit_transform(&docs).unwrap();
        let encoder = LabelEncoder::fit(&labels).unwrap();
        let y: Vec<usize> = labels.iter().map(|l| encoder.transform(l).unwrap()).collect();

        let mut model = LinearClassifier::new().with_max_iter(800);
        model
            .fit(&rows, &y, encoder.len(), vectorizer.vocabulary_size(), None)
            .unwrap();

        Arc::new(ArtifactBundle {
            vectorizer,
            model,
            encoder,
        })
    }

    #[test]
    fn test_predict_returns_label_and_distribution() {
        let classifier = ModelClassifier::new(trained_bundle());
        let (emotion, probs) = classifier.predict("cheerful delighted").unwrap();
        assert_eq!(emotion, Emotion::Joy);
        assert_eq!(probs.len(), 2);
        let total: f64 = probs.values().sum();
        assert!((total - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_probabilities_are_rounded() {
        let classifier = ModelClassifier::new(trained_bundle());
        let (_, probs) = classifier.predict("gloomy tears").unwrap();
        for &p in probs.values() {
            assert_eq!(p, (p * 10_000.0).round() / 10_000.0);
        }
    }

    #[tokio::test]
    async fn test_model_stage_never_abstains() {
        let classifier = ModelClassifier::new(trained_bundle());
        let detection = classifier
            .classify("completely unrelated words")
            .await
            .unwrap()
            .expect("model stage always resolves");
        assert!(detection.probabilities.is_some());
    }
}
