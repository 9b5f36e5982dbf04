//! Trainer: vectorize, split, fit, evaluate, bundle.

use crate::dataset::{TrainingExample, DEFAULT_SEED};
use emokit_classifiers::{
    ArtifactBundle, LabelEncoder, LinearClassifier, TfidfVectorizer, DEFAULT_MAX_FEATURES,
    DEFAULT_MAX_ITER,
};
use emokit_core::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Default held-out fraction for evaluation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.20;

/// Trainer tunables.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub max_features: usize,
    pub test_fraction: f64,
    pub max_iter: usize,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            test_fraction: DEFAULT_TEST_FRACTION,
            max_iter: DEFAULT_MAX_ITER,
            seed: DEFAULT_SEED,
        }
    }
}

/// Per-class evaluation metrics.
#[derive(Debug, Clone)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Held-out evaluation summary.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub per_class: BTreeMap<String, ClassMetrics>,
    pub train_size: usize,
    pub test_size: usize,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "accuracy {:.4} ({} train / {} test)",
            self.accuracy, self.train_size, self.test_size
        )?;
        writeln!(
            f,
            "{:<12} {:>9} {:>9} {:>9} {:>9}",
            "class", "precision", "recall", "f1", "support"
        )?;
        for (label, m) in &self.per_class {
            writeln!(
                f,
                "{label:<12} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}

/// Fit the vectorizer, encoder, and model over a balanced dataset and
/// evaluate on a stratified held-out split.
pub fn train(
    examples: &[TrainingExample],
    config: &TrainConfig,
) -> Result<(ArtifactBundle, TrainingReport)> {
    if examples.is_empty() {
        return Err(Error::training("cannot train on an empty dataset"));
    }

    let labels: Vec<&str> = examples.iter().map(|e| e.label.as_str()).collect();
    let encoder = LabelEncoder::fit(&labels)?;
    let y: Vec<usize> = labels
        .iter()
        .map(|l| encoder.transform(l))
        .collect::<Result<_>>()?;

    // The vectorizer sees the full balanced corpus, the model only the
    // training split.
    let clean: Vec<&str> = examples.iter().map(|e| e.clean.as_str()).collect();
    let mut vectorizer = TfidfVectorizer::new(config.max_features);
    let rows = vectorizer.fit_transform(&clean)?;
    info!(
        samples = examples.len(),
        classes = encoder.len(),
        features = vectorizer.vocabulary_size(),
        "vectorized corpus"
    );

    let (train_idx, test_idx) =
        stratified_split(&y, encoder.len(), config.test_fraction, config.seed)?;

    let x_train: Vec<_> = train_idx.iter().map(|&i| rows[i].clone()).collect();
    let y_train: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
    let weights = balanced_weights(&y_train, encoder.len());

    let mut model = LinearClassifier::new().with_max_iter(config.max_iter);
    model.fit(
        &x_train,
        &y_train,
        encoder.len(),
        vectorizer.vocabulary_size(),
        Some(&weights),
    )?;

    let y_test: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();
    let y_pred: Vec<usize> = test_idx
        .iter()
        .map(|&i| model.predict_one(&rows[i]))
        .collect::<Result<_>>()?;
    let report = evaluate(&y_test, &y_pred, &encoder, train_idx.len());
    info!(accuracy = report.accuracy, "training finished");

    Ok((
        ArtifactBundle {
            vectorizer,
            model,
            encoder,
        },
        report,
    ))
}

/// Stratified index split. The test share follows `test_fraction`, clamped
/// so every class can appear on both sides of small datasets; fewer samples
/// than classes is unrecoverable.
fn stratified_split(
    y: &[usize],
    n_classes: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let n = y.len();
    if n < n_classes {
        return Err(Error::dataset(format!(
            "{n} samples cannot cover {n_classes} classes"
        )));
    }

    let mut test_target = (n as f64 * test_fraction).round() as usize;
    if test_target < n_classes {
        test_target = n_classes.max(n / 3);
    }
    if n - test_target < n_classes {
        test_target = (n - n_classes).max(1);
    }

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (i, &label) in y.iter().enumerate() {
        by_class[label].push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_idx = Vec::new();
    let mut test_idx = Vec::new();
    for group in &mut by_class {
        group.shuffle(&mut rng);
        let mut take = ((test_target * group.len()) as f64 / n as f64).round() as usize;
        // Keep at least one sample of the class on each side when possible.
        take = take.clamp(1, group.len().saturating_sub(1).max(1));
        if group.len() == 1 {
            take = 0;
        }
        test_idx.extend(group.iter().take(take));
        train_idx.extend(group.iter().skip(take));
    }

    if train_idx.is_empty() || test_idx.is_empty() {
        return Err(Error::dataset("dataset too small for a held-out split"));
    }
    Ok((train_idx, test_idx))
}

/// `n / (k * count_c)` per-sample weights over the training labels.
fn balanced_weights(y_train: &[usize], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0usize; n_classes];
    for &label in y_train {
        counts[label] += 1;
    }
    let n = y_train.len() as f64;
    y_train
        .iter()
        .map(|&label| n / (n_classes as f64 * counts[label].max(1) as f64))
        .collect()
}

fn evaluate(
    y_test: &[usize],
    y_pred: &[usize],
    encoder: &LabelEncoder,
    train_size: usize,
) -> TrainingReport {
    let n_classes = encoder.len();
    let mut tp = vec![0usize; n_classes];
    let mut fp = vec![0usize; n_classes];
    let mut fn_ = vec![0usize; n_classes];
    let mut correct = 0usize;

    for (&truth, &pred) in y_test.iter().zip(y_pred) {
        if truth == pred {
            correct += 1;
            tp[truth] += 1;
        } else {
            fp[pred] += 1;
            fn_[truth] += 1;
        }
    }

    let mut per_class = BTreeMap::new();
    for (idx, label) in encoder.classes().iter().enumerate() {
        let precision = ratio(tp[idx], tp[idx] + fp[idx]);
        let recall = ratio(tp[idx], tp[idx] + fn_[idx]);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        per_class.insert(
            label.clone(),
            ClassMetrics {
                precision,
                recall,
                f1,
                support: tp[idx] + fn_[idx],
            },
        );
    }

    TrainingReport {
        accuracy: ratio(correct, y_test.len()),
        per_class,
        train_size,
        test_size: y_test.len(),
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{balance, with_clean};
    use emokit_core::TextNormalizer;

    fn toy_examples() -> Vec<TrainingExample> {
        let mut rows = Vec::new();
        for i in 0..20 {
            rows.push((format!("cheerful delighted smile {i}"), "joy".to_string()));
            rows.push((format!("gloomy mourning tears {i}"), "sadness".to_string()));
            rows.push((format!("furious outraged seething {i}"), "anger".to_string()));
        }
        let normalizer = TextNormalizer::with_stop_words(Vec::<String>::new());
        with_clean(rows, &normalizer)
    }

    #[test]
    fn test_train_separable_corpus() {
        let examples = balance(toy_examples(), DEFAULT_SEED);
        let config = TrainConfig {
            max_features: 500,
            max_iter: 800,
            ..TrainConfig::default()
        };
        let (bundle, report) = train(&examples, &config).unwrap();

        assert_eq!(bundle.encoder.classes(), ["anger", "joy", "sadness"]);
        assert!(report.accuracy > 0.9, "accuracy {}", report.accuracy);
        assert_eq!(report.per_class.len(), 3);
        assert_eq!(report.train_size + report.test_size, examples.len());
    }

    #[test]
    fn test_train_is_deterministic() {
        let examples = balance(toy_examples(), DEFAULT_SEED);
        let config = TrainConfig {
            max_features: 500,
            max_iter: 200,
            ..TrainConfig::default()
        };
        let (_, a) = train(&examples, &config).unwrap();
        let (_, b) = train(&examples, &config).unwrap();
        assert_eq!(a.accuracy, b.accuracy);
        assert_eq!(a.test_size, b.test_size);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        assert!(train(&[], &TrainConfig::default()).is_err());
    }

    #[test]
    fn test_stratified_split_covers_every_class() {
        let y: Vec<usize> = (0..30).map(|i| i % 3).collect();
        let (train_idx, test_idx) = stratified_split(&y, 3, 0.2, DEFAULT_SEED).unwrap();
        assert_eq!(train_idx.len() + test_idx.len(), 30);
        for class in 0..3 {
            assert!(train_idx.iter().any(|&i| y[i] == class));
            assert!(test_idx.iter().any(|&i| y[i] == class));
        }
    }

    #[test]
    fn test_split_clamps_for_tiny_inputs() {
        // 0.2 * 6 rounds to 1, below the class count; the clamp widens the
        // test side so every class can appear.
        let y = vec![0, 0, 1, 1, 2, 2];
        let (train_idx, test_idx) = stratified_split(&y, 3, 0.2, DEFAULT_SEED).unwrap();
        assert!(!train_idx.is_empty());
        assert!(!test_idx.is_empty());
        assert_eq!(train_idx.len() + test_idx.len(), 6);
    }

    #[test]
    fn test_fewer_samples_than_classes_is_fatal() {
        let y = vec![0, 1];
        assert!(stratified_split(&y, 3, 0.2, DEFAULT_SEED).is_err());
    }

    #[test]
    fn test_balanced_weights_even_out_classes() {
        let y = vec![0, 0, 0, 1];
        let weights = balanced_weights(&y, 2);
        // Minority samples weigh three times as much.
        assert!((weights[3] / weights[0] - 3.0).abs() < 1e-9);
        let total: f64 = weights.iter().sum();
        assert!((total - y.len() as f64).abs() < 1e-9);
    }

    #[test]
    fn test_report_display_lists_classes() {
        let examples = balance(toy_examples(), DEFAULT_SEED);
        let config = TrainConfig {
            max_features: 500,
            max_iter: 200,
            ..TrainConfig::default()
        };
        let (_, report) = train(&examples, &config).unwrap();
        let rendered = report.to_string();
        assert!(rendered.contains("accuracy"));
        assert!(rendered.contains("joy"));
        assert!(rendered.contains("sadness"));
    }
}
