//! Sentiment-polarity fallback.
//!
//! When the lexicon matcher abstains, a compound valence score over the raw
//! text is mapped onto the discrete labels: strong positive becomes joy,
//! strong negative is disambiguated among anger, disgust, and sadness by
//! keyword sets, and the dead zone defers to the trained model.

use crate::classifier::{Classifier, Detection};
use crate::lexicon::word_tokens;
use async_trait::async_trait;
use emokit_core::{Emotion, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;

/// Default positive threshold for mapping compound score to joy.
pub const DEFAULT_POS_THRESHOLD: f64 = 0.55;
/// Default negative threshold for mapping compound score to a negative label.
pub const DEFAULT_NEG_THRESHOLD: f64 = -0.55;

/// Scale applied to a valence hit preceded by a negator ("not good").
const NEGATION_SCALAR: f64 = -0.74;
/// Boost applied to a valence hit preceded by an intensifier ("very good").
const BOOSTER_INCREMENT: f64 = 0.293;
/// How many preceding tokens are inspected for a negator.
const NEGATION_WINDOW: usize = 3;

const NEGATORS: [&str; 10] = [
    "not", "no", "never", "nothing", "cant", "cannot", "dont", "wont", "isnt", "wasnt",
];
const BOOSTERS: [&str; 6] = ["so", "very", "really", "too", "extremely", "absolutely"];

/// Compound-valence scoring strategy.
///
/// Two implementations exist: the real [`ValenceScorer`] and the
/// [`NeutralScorer`] stub substituted at construction time when the valence
/// resource cannot be loaded. Selection happens once, up front, so the call
/// path never branches on resource availability.
pub trait PolarityScorer: Send + Sync {
    /// Compound polarity of the text, in [-1, 1].
    fn compound(&self, text: &str) -> f64;

    /// Name of the scoring strategy, for diagnostics.
    fn name(&self) -> &'static str;
}

/// Valence table plus disambiguation keywords, deserialized from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolaritySpec {
    /// Tokens that pull a strongly negative text toward anger
    pub anger_keywords: Vec<String>,

    /// Tokens that pull a strongly negative text toward disgust
    pub disgust_keywords: Vec<String>,

    /// Per-word valence, VADER convention (roughly -4..4)
    pub valence: HashMap<String, f64>,
}

impl PolaritySpec {
    /// The valence resource bundled with the crate.
    pub fn bundled() -> Result<Self> {
        Ok(serde_yaml::from_str(include_str!("../data/polarity.yaml"))?)
    }

    /// Load a valence resource from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Lexicon-based compound scorer in the VADER style: summed per-word
/// valences with negation flips and intensifier boosts, normalized into
/// [-1, 1] by `x / sqrt(x^2 + 15)`.
pub struct ValenceScorer {
    valence: HashMap<String, f64>,
}

impl ValenceScorer {
    pub fn new(valence: HashMap<String, f64>) -> Self {
        Self { valence }
    }
}

impl PolarityScorer for ValenceScorer {
    fn compound(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens = word_tokens(&lowered);

        let mut sum = 0.0;
        for (i, tok) in tokens.iter().enumerate() {
            let Some(&valence) = self.valence.get(*tok) else {
                continue;
            };
            let mut v = valence;

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i]
                .iter()
                .any(|prev| NEGATORS.contains(prev))
            {
                v *= NEGATION_SCALAR;
            } else if i > 0 && BOOSTERS.contains(&tokens[i - 1]) {
                v += BOOSTER_INCREMENT * v.signum();
            }

            sum += v;
        }

        if sum == 0.0 {
            return 0.0;
        }
        (sum / (sum * sum + 15.0).sqrt()).clamp(-1.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "valence"
    }
}

/// Stub scorer used when the valence resource is unavailable: every text is
/// neutral, so the fallback always defers to the next stage.
pub struct NeutralScorer;

impl PolarityScorer for NeutralScorer {
    fn compound(&self, _text: &str) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "neutral-stub"
    }
}

/// Polarity fallback stage: compound score thresholds plus negative-emotion
/// keyword disambiguation.
pub struct PolarityFallback {
    name: String,
    scorer: Box<dyn PolarityScorer>,
    anger_keywords: HashSet<String>,
    disgust_keywords: HashSet<String>,
    pos_threshold: f64,
    neg_threshold: f64,
}

impl PolarityFallback {
    /// Build the fallback from the bundled valence resource. A broken
    /// resource degrades to the neutral-always scorer instead of failing.
    pub fn new() -> Self {
        match PolaritySpec::bundled() {
            Ok(spec) => {
                Self::with_spec(spec, DEFAULT_POS_THRESHOLD, DEFAULT_NEG_THRESHOLD)
            }
            Err(e) => {
                tracing::warn!("valence resource unavailable, polarity stage is inert: {e}");
                Self::neutral()
            }
        }
    }

    /// Build from an explicit spec and thresholds.
    pub fn with_spec(spec: PolaritySpec, pos_threshold: f64, neg_threshold: f64) -> Self {
        Self {
            name: "polarity".to_string(),
            scorer: Box::new(ValenceScorer::new(spec.valence)),
            anger_keywords: spec.anger_keywords.into_iter().collect(),
            disgust_keywords: spec.disgust_keywords.into_iter().collect(),
            pos_threshold,
            neg_threshold,
        }
    }

    /// Build an inert fallback around the neutral-always stub.
    pub fn neutral() -> Self {
        Self {
            name: "polarity".to_string(),
            scorer: Box::new(NeutralScorer),
            anger_keywords: HashSet::new(),
            disgust_keywords: HashSet::new(),
            pos_threshold: DEFAULT_POS_THRESHOLD,
            neg_threshold: DEFAULT_NEG_THRESHOLD,
        }
    }

    /// Which scoring strategy ended up selected.
    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Map the compound score onto a label, or abstain in the dead zone.
    pub fn find_emotion(&self, raw: &str) -> Option<Emotion> {
        let compound = self.scorer.compound(raw);

        if compound >= self.pos_threshold {
            return Some(Emotion::Joy);
        }
        if compound <= self.neg_threshold {
            let lowered = raw.to_lowercase();
            let tokens: HashSet<&str> = word_tokens(&lowered).into_iter().collect();
            if tokens.iter().any(|t| self.anger_keywords.contains(*t)) {
                return Some(Emotion::Anger);
            }
            if tokens.iter().any(|t| self.disgust_keywords.contains(*t)) {
                return Some(Emotion::Disgust);
            }
            return Some(Emotion::Sadness);
        }
        None
    }
}

impl Default for PolarityFallback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for PolarityFallback {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> PolarityFallback {
        PolarityFallback::new()
    }

    #[test]
    fn test_strong_positive_maps_to_joy() {
        // "love" (3.2) alone normalizes to 3.2 / sqrt(3.2^2 + 15) ~ 0.637.
        assert_eq!(fallback().find_emotion("love it"), Some(Emotion::Joy));
        assert_eq!(
            fallback().find_emotion("what an amazing wonderful day"),
            Some(Emotion::Joy)
        );
    }

    #[test]
    fn test_strong_negative_defaults_to_sadness() {
        // Strongly negative, no anger or disgust keywords.
        assert_eq!(
            fallback().find_emotion("everything went wrong, a painful failure"),
            Some(Emotion::Sadness)
        );
    }

    #[test]
    fn test_anger_keywords_win_among_negatives() {
        assert_eq!(
            fallback().find_emotion("I hate this terrible awful thing"),
            Some(Emotion::Anger)
        );
    }

    #[test]
    fn test_disgust_keywords_checked_after_anger() {
        assert_eq!(
            fallback().find_emotion("the rotten food made everyone horribly sick and nasty"),
            Some(Emotion::Disgust)
        );
    }

    #[test]
    fn test_dead_zone_abstains() {
        assert_eq!(fallback().find_emotion("the meeting is at noon"), None);
        // A single mildly negative word stays inside the dead zone.
        assert_eq!(fallback().find_emotion("sick"), None);
    }

    #[test]
    fn test_empty_text_abstains() {
        assert_eq!(fallback().find_emotion(""), None);
    }

    #[test]
    fn test_negation_flips_valence() {
        let spec = PolaritySpec::bundled().unwrap();
        let scorer = ValenceScorer::new(spec.valence);
        let plain = scorer.compound("this is good");
        let negated = scorer.compound("this is not good");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
    }

    #[test]
    fn test_booster_raises_magnitude() {
        let spec = PolaritySpec::bundled().unwrap();
        let scorer = ValenceScorer::new(spec.valence);
        assert!(scorer.compound("very good") > scorer.compound("good"));
    }

    #[test]
    fn test_neutral_stub_always_abstains() {
        let inert = PolarityFallback::neutral();
        assert_eq!(inert.scorer_name(), "neutral-stub");
        assert_eq!(inert.find_emotion("I hate this terrible awful thing"), None);
        assert_eq!(inert.find_emotion("what an amazing wonderful day"), None);
    }

    #[tokio::test]
    async fn test_classifier_trait_surface() {
        let detection = fallback()
            .classify("love it")
            .await
            .unwrap()
            .expect("strong positive resolves");
        assert_eq!(detection.emotion, Emotion::Joy);
        assert!(detection.probabilities.is_none());
    }
}
