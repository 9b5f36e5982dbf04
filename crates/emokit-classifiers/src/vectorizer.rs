//! TF-IDF vectorizer over normalized text.
//!
//! Word tokens of length ≥ 2, unigrams and bigrams, vocabulary capped by
//! corpus frequency, smoothed IDF, L2-normalized sparse rows. The learned
//! vocabulary is fixed at fit time; `transform` silently ignores unseen
//! terms.

use emokit_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 12_000;

/// Sparse feature row: (feature index, weight), sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

// Feature tokens need at least two word characters, so stray single
// letters never enter the vocabulary.
static FEATURE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w\w+").expect("valid feature token regex"));

/// TF-IDF vectorizer with unigram + bigram features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_min: usize,
    ngram_max: usize,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer with the given vocabulary cap and
    /// unigram + bigram features.
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            ngram_min: 1,
            ngram_max: 2,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Learn the vocabulary and IDF weights, then transform the corpus.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        Ok(documents
            .iter()
            .map(|doc| self.transform_one(doc.as_ref()))
            .collect())
    }

    /// Learn the vocabulary and IDF weights from the corpus.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(Error::training("cannot fit vectorizer on zero documents"));
        }

        let n_docs = documents.len();
        let mut corpus_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.terms(doc.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *corpus_freq.entry(term.clone()).or_insert(0) += 1;
                seen.insert(term);
            }
            for term in seen {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        // Keep the most frequent terms, ties broken alphabetically, then
        // index the surviving vocabulary in alphabetical order.
        let mut ranked: Vec<(String, usize)> = corpus_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        self.idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0);
                ((1 + n_docs) as f64 / (1 + df) as f64).ln() + 1.0
            })
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        Ok(())
    }

    /// Transform one document into a sparse TF-IDF row.
    pub fn transform_one(&self, document: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.terms(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * self.idf[idx]))
            .collect();
        row.sort_by_key(|&(idx, _)| idx);

        let norm: f64 = row.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }

    /// Transform a batch of documents.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents
            .iter()
            .map(|doc| self.transform_one(doc.as_ref()))
            .collect()
    }

    /// Number of learned features.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Extract unigram and bigram terms from a document.
    fn terms(&self, document: &str) -> Vec<String> {
        let tokens: Vec<&str> = FEATURE_TOKEN_RE
            .find_iter(document)
            .map(|m| m.as_str())
            .collect();

        let mut terms = Vec::with_capacity(tokens.len() * 2);
        for n in self.ngram_min..=self.ngram_max {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_builds_unigrams_and_bigrams() {
        let mut vec = TfidfVectorizer::new(100);
        vec.fit(&["happy day", "sad day"]).unwrap();
        // Unigrams: happy, sad, day. Bigrams: "happy day", "sad day".
        assert_eq!(vec.vocabulary_size(), 5);
    }

    #[test]
    fn test_short_tokens_are_ignored() {
        let mut vec = TfidfVectorizer::new(100);
        vec.fit(&["a b c ok"]).unwrap();
        assert_eq!(vec.vocabulary_size(), 1);
    }

    #[test]
    fn test_rows_are_l2_normalized() {
        let mut vec = TfidfVectorizer::new(100);
        let rows = vec.fit_transform(&["happy happy day", "sad day"]).unwrap();
        for row in rows {
            let norm: f64 = row.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "norm {norm}");
        }
    }

    #[test]
    fn test_unseen_terms_ignored_at_transform_time() {
        let mut vec = TfidfVectorizer::new(100);
        vec.fit(&["happy day"]).unwrap();
        let row = vec.transform_one("completely unrelated words");
        assert!(row.is_empty());
    }

    #[test]
    fn test_rarer_terms_weigh_more() {
        let mut vec = TfidfVectorizer::new(100);
        // "day" appears in every document, "happy" in one.
        vec.fit(&["happy day", "calm day", "slow day"]).unwrap();
        let row = vec.transform_one("happy day");
        let weight = |term: &str| {
            let idx = vec.vocabulary[term];
            row.iter().find(|&&(i, _)| i == idx).map(|&(_, w)| w)
        };
        assert!(weight("happy").unwrap() > weight("day").unwrap());
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let mut vec = TfidfVectorizer::new(2);
        vec.fit(&["happy day", "sad day", "happy night"]).unwrap();
        assert_eq!(vec.vocabulary_size(), 2);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let mut vec = TfidfVectorizer::new(100);
        assert!(vec.fit(&Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_serde_round_trip_preserves_transform() {
        let mut vec = TfidfVectorizer::new(100);
        vec.fit(&["happy day", "sad night"]).unwrap();
        let json = serde_json::to_string(&vec).unwrap();
        let restored: TfidfVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(vec.transform_one("happy day"), restored.transform_one("happy day"));
    }
}
