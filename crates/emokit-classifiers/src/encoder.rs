//! Label encoder: bijection between label strings and class indices.

use emokit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bijective label ↔ index mapping.
///
/// Classes are sorted lexicographically at fit time, so the mapping is
/// identical between training and inference regardless of input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit the encoder over the distinct labels in `labels`.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let classes: BTreeSet<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        if classes.is_empty() {
            return Err(Error::training("cannot fit label encoder on zero labels"));
        }
        Ok(Self {
            classes: classes.into_iter().collect(),
        })
    }

    /// Encode a label into its class index.
    pub fn transform(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| Error::dataset(format!("label {label:?} was not seen at fit time")))
    }

    /// Decode a class index back into its label.
    pub fn inverse_transform(&self, index: usize) -> Result<&str> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| Error::classifier(format!("class index {index} out of range")))
    }

    /// The ordered class labels.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
