//! Text normalization shared by every prediction stage and the trainer.
//!
//! The pass is: lowercase, strip punctuation (apostrophes and emoji survive),
//! drop stop words (minus a negation/intensity keep-list), lemmatize. It is
//! pure, deterministic, and idempotent.

use std::collections::HashSet;

/// Emoji code points that survive punctuation stripping. Emoji outside this
/// range are still honored by the raw-text emoji scan in the lexicon matcher.
const EMOJI_RANGE: std::ops::RangeInclusive<char> = '\u{1F600}'..='\u{1F64F}';

/// Stop words that must survive removal: they carry the negation and
/// intensity signal the polarity fallback and the trained model rely on.
const KEEP_WORDS: [&str; 6] = ["not", "no", "so", "very", "really", "too"];

/// Reusable text normalizer.
///
/// Construct once (the stop-word list is materialized at build time) and
/// share by reference; [`TextNormalizer::normalize`] has no side effects.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: HashSet<String>,
}

impl TextNormalizer {
    /// Build a normalizer with the bundled English stop-word list.
    pub fn new() -> Self {
        let mut stop_words: HashSet<String> = stop_words::get(stop_words::LANGUAGE::English)
            .into_iter()
            .collect();
        for keep in KEEP_WORDS {
            stop_words.remove(keep);
        }
        Self { stop_words }
    }

    /// Build a normalizer with an explicit stop-word set (used by tests and
    /// callers with domain-specific lists). The keep-list still applies.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stop_words: HashSet<String> = words.into_iter().map(Into::into).collect();
        for keep in KEEP_WORDS {
            stop_words.remove(keep);
        }
        Self { stop_words }
    }

    /// Normalize a text to its clean form.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        let mut stripped = String::with_capacity(lowered.len());
        for ch in lowered.chars() {
            if ch.is_alphanumeric()
                || ch == '_'
                || ch == '\''
                || ch.is_whitespace()
                || EMOJI_RANGE.contains(&ch)
            {
                stripped.push(ch);
            } else {
                // A single space so punctuation never merges adjacent words.
                stripped.push(' ');
            }
        }

        stripped
            .split_whitespace()
            .filter(|tok| !self.is_stop_word(tok))
            .map(lemmatize)
            // Re-check after lemmatization so the pass stays idempotent:
            // a token whose lemma is itself a stop word must not survive.
            .filter(|tok| !self.is_stop_word(tok))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a token to a dictionary base form with noun-style suffix rules.
///
/// The rules are chosen so that `lemmatize(lemmatize(t)) == lemmatize(t)`:
/// a stripped form never re-matches a rule.
fn lemmatize(token: &str) -> String {
    let n = token.len();
    if n <= 3 {
        return token.to_string();
    }

    for (suffix, replacement) in [
        ("ches", "ch"),
        ("shes", "sh"),
        ("sses", "ss"),
        ("ies", "y"),
        ("xes", "x"),
        ("zes", "z"),
        ("ves", "f"),
        ("men", "man"),
    ] {
        if let Some(stem) = token.strip_suffix(suffix) {
            if !stem.is_empty() {
                return format!("{stem}{replacement}");
            }
        }
    }

    // Plural 's', guarded so mass nouns ("glass"), Latin endings ("virus",
    // "basis") and possessives ("dog's") are untouched. Stems ending in
    // "men" are also left alone ("omens"): stripping would hand them to the
    // men->man rule on a repeat pass.
    if let Some(stem) = token.strip_suffix('s') {
        let blocked = stem.ends_with('s')
            || stem.ends_with('u')
            || stem.ends_with('i')
            || stem.ends_with('\'')
            || stem.ends_with("men");
        if !blocked {
            return stem.to_string();
        }
    }

    token.to_string()
}
