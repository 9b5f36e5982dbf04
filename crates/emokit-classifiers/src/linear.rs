//! Multinomial logistic regression over sparse TF-IDF rows.
//!
//! Softmax with cross-entropy loss, batch gradient descent, optional
//! per-sample weights (the trainer passes class-balanced weights). The
//! iteration cap is generous; in practice the balanced training sets
//! converge long before it is reached.

use crate::vectorizer::SparseVector;
use emokit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default iteration cap, matching a generous convergence budget.
pub const DEFAULT_MAX_ITER: usize = 4_000;

const DEFAULT_LEARNING_RATE: f64 = 0.5;
const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Linear classifier with softmax output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// Per-class weight rows, `n_classes x n_features`
    weights: Vec<Vec<f64>>,
    /// Per-class bias terms
    bias: Vec<f64>,
    n_features: usize,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
}

impl LinearClassifier {
    /// Create an unfitted classifier with default hyperparameters.
    pub fn new() -> Self {
        Self {
            weights: Vec::new(),
            bias: Vec::new(),
            n_features: 0,
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iter: DEFAULT_MAX_ITER,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the gradient descent step size.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Number of classes the model was fitted for.
    pub fn n_classes(&self) -> usize {
        self.weights.len()
    }

    /// Fit the model.
    ///
    /// `sample_weights`, when given, must be one weight per sample; the
    /// trainer uses `n / (k * count_c)` class balancing.
    pub fn fit(
        &mut self,
        x: &[SparseVector],
        y: &[usize],
        n_classes: usize,
        n_features: usize,
        sample_weights: Option<&[f64]>,
    ) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::training("sample and label counts must match"));
        }
        if x.is_empty() {
            return Err(Error::training("cannot fit with zero samples"));
        }
        if n_classes < 2 {
            return Err(Error::training("need at least two classes"));
        }
        if let Some(idx) = y.iter().find(|&&label| label >= n_classes) {
            return Err(Error::training(format!(
                "label index {idx} out of range for {n_classes} classes"
            )));
        }
        if let Some(w) = sample_weights {
            if w.len() != x.len() {
                return Err(Error::training("one sample weight per sample required"));
            }
        }

        self.n_features = n_features;
        self.weights = vec![vec![0.0; n_features]; n_classes];
        self.bias = vec![0.0; n_classes];

        let n = x.len();
        let weight_total: f64 = sample_weights
            .map(|w| w.iter().sum())
            .unwrap_or(n as f64);

        for iter in 0..self.max_iter {
            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];

            for (i, row) in x.iter().enumerate() {
                let probs = self.softmax_row(row);
                let sw = sample_weights.map_or(1.0, |w| w[i]);
                for (c, &p) in probs.iter().enumerate() {
                    let err = sw * (p - if y[i] == c { 1.0 } else { 0.0 });
                    grad_b[c] += err;
                    for &(idx, value) in row {
                        grad_w[c][idx] += err * value;
                    }
                }
            }

            let mut grad_norm = 0.0;
            for c in 0..n_classes {
                grad_b[c] /= weight_total;
                grad_norm += grad_b[c] * grad_b[c];
                self.bias[c] -= self.learning_rate * grad_b[c];
                for j in 0..n_features {
                    let g = grad_w[c][j] / weight_total;
                    grad_norm += g * g;
                    self.weights[c][j] -= self.learning_rate * g;
                }
            }

            if grad_norm.sqrt() < self.tolerance {
                debug!(iterations = iter + 1, "gradient descent converged");
                break;
            }
        }

        Ok(())
    }

    /// Predict the class index for one row.
    pub fn predict_one(&self, row: &SparseVector) -> Result<usize> {
        let probs = self.predict_proba_one(row)?;
        Ok(probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, _)| idx)
            .unwrap_or(0))
    }

    /// Predict class indices for a batch.
    pub fn predict(&self, rows: &[SparseVector]) -> Result<Vec<usize>> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }

    /// Calibrated class probabilities for one row (softmax output).
    pub fn predict_proba_one(&self, row: &SparseVector) -> Result<Vec<f64>> {
        if self.weights.is_empty() {
            return Err(Error::not_ready("linear classifier is not fitted"));
        }
        Ok(self.softmax_row(row))
    }

    fn softmax_row(&self, row: &SparseVector) -> Vec<f64> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(w, &b)| b + row.iter().map(|&(idx, v)| w[idx] * v).sum::<f64>())
            .collect();

        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|&z| (z - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }
}

impl Default for LinearClassifier {
    fn default() -> Self {
        Self::new()
    }
}
