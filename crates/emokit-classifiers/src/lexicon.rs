//! Emotion lexicon configuration and the typo-tolerant lexicon matcher.
//!
//! The lexicon is configuration data, not code: the bundled YAML can be
//! replaced at runtime with [`LexiconSpec::from_file`] to extend the curated
//! word and emoji sets without touching the matching algorithm.

use crate::classifier::{Classifier, Detection};
use crate::similarity::similarity_ratio;
use aho_corasick::AhoCorasick;
use async_trait::async_trait;
use emokit_core::{Emotion, Error, Result, TextNormalizer};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;

/// Similarity cutoff used by the fuzzy stages when none is configured.
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.72;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid token regex"));

/// Tokenize on word characters, mirroring the matcher's view of clean text.
pub(crate) fn word_tokens(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// One emotion's curated entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionEntry {
    /// Word (and multi-word) entries
    pub words: Vec<String>,

    /// Emoji glyphs scanned against the raw text
    #[serde(default)]
    pub emoji: Vec<String>,
}

/// The full lexicon specification, deserialized from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconSpec {
    /// Entries keyed by emotion
    pub emotions: HashMap<Emotion, EmotionEntry>,
}

impl LexiconSpec {
    /// The lexicon bundled with the crate.
    pub fn bundled() -> Result<Self> {
        let spec: Self = serde_yaml::from_str(include_str!("../data/lexicon.yaml"))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load a lexicon from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let spec: Self = serde_yaml::from_str(&content)?;
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<()> {
        if self.emotions.contains_key(&Emotion::Neutral) {
            return Err(Error::config(
                "lexicon must not contain entries for the neutral label",
            ));
        }
        if self.emotions.is_empty() {
            return Err(Error::config("lexicon contains no emotions"));
        }
        Ok(())
    }
}

/// Typo-tolerant dictionary matcher over the curated lexicon.
///
/// Stages run in strict order, first hit wins: raw-text emoji scan, exact
/// token membership, joined-token match, fuzzy single tokens, fuzzy
/// 2- and 3-gram windows. Wherever entries overlap across emotions, the
/// traversal follows [`Emotion::CANONICAL`], so the earlier emotion wins;
/// the same order breaks ties between emoji of different emotions.
pub struct LexiconMatcher {
    name: String,
    normalizer: TextNormalizer,
    /// Word sets per emotion, emoji merged in (an emoji typed mid-sentence
    /// survives normalization and can still match exactly).
    word_sets: HashMap<Emotion, HashSet<String>>,
    /// All entries, sorted, for the fuzzy stages.
    all_entries: Vec<String>,
    /// Raw-text emoji scanners, in canonical emotion order.
    emoji_scanners: Vec<(Emotion, AhoCorasick)>,
    cutoff: f64,
}

impl LexiconMatcher {
    /// Build a matcher from the bundled lexicon with the default cutoff.
    pub fn new(normalizer: TextNormalizer) -> Result<Self> {
        Self::with_spec(LexiconSpec::bundled()?, normalizer, DEFAULT_FUZZY_CUTOFF)
    }

    /// Build a matcher from an explicit spec and similarity cutoff.
    pub fn with_spec(spec: LexiconSpec, normalizer: TextNormalizer, cutoff: f64) -> Result<Self> {
        let mut word_sets: HashMap<Emotion, HashSet<String>> = HashMap::new();
        let mut emoji_scanners = Vec::new();

        for emotion in Emotion::CANONICAL {
            let Some(entry) = spec.emotions.get(&emotion) else {
                continue;
            };

            let mut set: HashSet<String> = entry.words.iter().cloned().collect();
            set.extend(entry.emoji.iter().cloned());
            word_sets.insert(emotion, set);

            if !entry.emoji.is_empty() {
                let scanner = AhoCorasick::new(&entry.emoji).map_err(|e| {
                    Error::classifier(format!("failed to build emoji scanner for {emotion}: {e}"))
                })?;
                emoji_scanners.push((emotion, scanner));
            }
        }

        let mut all_entries: Vec<String> = word_sets
            .values()
            .flat_map(|set| set.iter().cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        all_entries.sort();

        Ok(Self {
            name: "lexicon".to_string(),
            normalizer,
            word_sets,
            all_entries,
            emoji_scanners,
            cutoff,
        })
    }

    /// Run the full matching cascade.
    pub fn find_emotion(&self, raw: &str) -> Option<Emotion> {
        // 1. Emoji in the raw, un-normalized text.
        for (emotion, scanner) in &self.emoji_scanners {
            if scanner.is_match(raw) {
                return Some(*emotion);
            }
        }

        let cleaned = self.normalizer.normalize(raw);
        let tokens = word_tokens(&cleaned);
        if tokens.is_empty() {
            return None;
        }

        // 2. Exact token membership.
        for tok in &tokens {
            for emotion in Emotion::CANONICAL {
                if self.contains(emotion, tok) {
                    return Some(emotion);
                }
            }
        }

        // 3. All tokens joined with no separator, against whole entries.
        let joined: String = tokens.concat();
        for emotion in Emotion::CANONICAL {
            if self.contains(emotion, &joined) {
                return Some(emotion);
            }
        }

        // 4. Fuzzy single tokens.
        for tok in &tokens {
            if let Some(entry) = self.closest_entry(tok) {
                return self.owner(entry);
            }
        }

        // 5. Fuzzy bigram/trigram windows, joined with no separator.
        for n in [2usize, 3] {
            for window in tokens.windows(n) {
                let gram: String = window.concat();
                if let Some(entry) = self.closest_entry(&gram) {
                    return self.owner(entry);
                }
            }
        }

        None
    }

    fn contains(&self, emotion: Emotion, token: &str) -> bool {
        self.word_sets
            .get(&emotion)
            .is_some_and(|set| set.contains(token))
    }

    /// Closest lexicon entry by similarity ratio, if it clears the cutoff.
    /// Ties keep the lexicographically first entry.
    fn closest_entry(&self, token: &str) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for entry in &self.all_entries {
            let ratio = similarity_ratio(token, entry);
            if ratio >= self.cutoff && best.map_or(true, |(_, b)| ratio > b) {
                best = Some((entry, ratio));
            }
        }
        best.map(|(entry, _)| entry)
    }

    /// First emotion in canonical order owning the entry.
    fn owner(&self, entry: &str) -> Option<Emotion> {
        Emotion::CANONICAL
            .into_iter()
            .find(|&emotion| self.contains(emotion, entry))
    }
}

#[async_trait]
impl Classifier for LexiconMatcher {
    async fn classify(&self, text: &str) -> Result<Option<Detection>> {
        let start = Instant::now();
        Ok(self.find_emotion(text).map(|emotion| {
            Detection::new(emotion).with_latency_us(start.elapsed().as_micros() as u64)
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
