//! Training data: seed CSV, template augmentation, and upsample balancing.
//!
//! Every stochastic step takes an explicit seed, so a given seed always
//! produces the same dataset.

use emokit_classifiers::LexiconSpec;
use emokit_core::{Emotion, Error, Result, TextNormalizer};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Default RNG seed for augmentation and balancing.
pub const DEFAULT_SEED: u64 = 42;
/// Default number of generated joy samples.
pub const DEFAULT_JOY_SAMPLES: usize = 300;
/// Default number of generated samples for every non-joy class.
pub const DEFAULT_OTHER_SAMPLES: usize = 200;

/// Probability that a generated joy word takes an intensifier prefix.
const INTENSIFIER_PROBABILITY: f64 = 0.3;
const INTENSIFIERS: [&str; 3] = ["so", "very", "really"];

/// How many lexicon joy words feed the joy templates.
const JOY_WORD_POOL: usize = 80;

const JOY_TEMPLATES: [&str; 6] = [
    "I am {} today",
    "I feel {}",
    "This makes me feel {}",
    "So {}",
    "I am very {}",
    "Feeling {}",
];
const ANGER_TEMPLATES: [&str; 6] = [
    "I hate {}",
    "{} pisses me off",
    "I am furious at {}",
    "I despise {}",
    "I can't stand {}",
    "I hate you",
];
const ANGER_TARGETS: [&str; 9] = [
    "him", "her", "them", "you", "this", "that", "it", "someone", "the person",
];
const DISGUST_TEMPLATES: [&str; 5] = [
    "That is disgusting",
    "I feel disgusted by {}",
    "This is gross",
    "This smells awful",
    "So gross {}",
];
const DISGUST_TARGETS: [&str; 4] = ["that", "this", "the food", "the smell"];
const SADNESS_TEMPLATES: [&str; 5] = [
    "I feel so sad",
    "I am heartbroken",
    "I just want to cry",
    "I feel depressed",
    "This makes me miserable",
];
const FEAR_TEMPLATES: [&str; 5] = [
    "I am so scared",
    "I feel terrified",
    "I am afraid of {}",
    "This frightens me",
    "I panic about {}",
];
const FEAR_TARGETS: [&str; 3] = ["this", "that", "the event"];
const SURPRISE_TEMPLATES: [&str; 5] = [
    "I did not expect that",
    "Wow that's surprising",
    "What a shock",
    "I am astonished",
    "That shocked me",
];

/// One labeled training example, carrying its normalized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: String,
    pub clean: String,
}

#[derive(Debug, Deserialize)]
struct SeedRecord {
    text: String,
    label: String,
}

/// Augmentation tunables.
#[derive(Debug, Clone)]
pub struct AugmentConfig {
    pub joy_samples: usize,
    pub other_samples: usize,
    pub seed: u64,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            joy_samples: DEFAULT_JOY_SAMPLES,
            other_samples: DEFAULT_OTHER_SAMPLES,
            seed: DEFAULT_SEED,
        }
    }
}

/// Write a minimal seed CSV when `path` does not exist. Returns `true` when
/// the file was created.
pub fn ensure_seed_csv(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        info!(path = %path.display(), "seed dataset already present");
        return Ok(false);
    }

    let samples: [(&str, Emotion); 9] = [
        ("I feel so happy today!", Emotion::Joy),
        ("This is the best day ever!", Emotion::Joy),
        ("I am excited and joyful.", Emotion::Joy),
        ("I am really sad.", Emotion::Sadness),
        ("Everything is falling apart.", Emotion::Sadness),
        ("I am so angry!", Emotion::Anger),
        ("This terrifies me", Emotion::Fear),
        ("That's disgusting", Emotion::Disgust),
        ("What a surprise!", Emotion::Surprise),
    ];

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["text", "label"])?;
    for (text, emotion) in samples {
        writer.write_record([text, emotion.as_str()])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = samples.len(), "wrote minimal seed dataset");
    Ok(true)
}

/// Load `(text, label)` rows from a seed CSV. A missing `text` or `label`
/// column is a fatal validation error.
pub fn load_seed_csv(path: impl AsRef<Path>) -> Result<Vec<(String, String)>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::dataset(format!("cannot read {}: {e}", path.display())))?;

    let headers = reader.headers()?.clone();
    for required in ["text", "label"] {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::dataset(format!(
                "{} is missing the required {required:?} column",
                path.display()
            )));
        }
    }

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let record: SeedRecord = record?;
        rows.push((record.text, record.label));
    }
    info!(path = %path.display(), rows = rows.len(), "loaded seed dataset");
    Ok(rows)
}

/// Generate synthetic `(text, label)` rows from the per-emotion templates.
pub fn augment(config: &AugmentConfig) -> Result<Vec<(String, String)>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let joy_words = joy_word_pool()?;
    let mut rows = Vec::with_capacity(config.joy_samples + 5 * config.other_samples);

    for _ in 0..config.joy_samples {
        let template = pick(&mut rng, &JOY_TEMPLATES);
        let mut word = pick(&mut rng, &joy_words).clone();
        if rng.gen_bool(INTENSIFIER_PROBABILITY) {
            word = format!("{} {word}", pick(&mut rng, &INTENSIFIERS));
        }
        rows.push((fill(template, &word), Emotion::Joy.as_str().to_string()));
    }

    for _ in 0..config.other_samples {
        let template = pick(&mut rng, &ANGER_TEMPLATES);
        let text = fill(template, *pick(&mut rng, &ANGER_TARGETS));
        rows.push((text, Emotion::Anger.as_str().to_string()));
    }
    for _ in 0..config.other_samples {
        let template = pick(&mut rng, &DISGUST_TEMPLATES);
        let text = fill(template, *pick(&mut rng, &DISGUST_TARGETS));
        rows.push((text, Emotion::Disgust.as_str().to_string()));
    }
    for _ in 0..config.other_samples {
        let template = pick(&mut rng, &SADNESS_TEMPLATES);
        rows.push((template.to_string(), Emotion::Sadness.as_str().to_string()));
    }
    for _ in 0..config.other_samples {
        let template = pick(&mut rng, &FEAR_TEMPLATES);
        let text = fill(template, *pick(&mut rng, &FEAR_TARGETS));
        rows.push((text, Emotion::Fear.as_str().to_string()));
    }
    for _ in 0..config.other_samples {
        let template = pick(&mut rng, &SURPRISE_TEMPLATES);
        rows.push((template.to_string(), Emotion::Surprise.as_str().to_string()));
    }

    info!(rows = rows.len(), seed = config.seed, "generated augmentation samples");
    Ok(rows)
}

/// Attach the normalized `clean` form to every row.
pub fn with_clean(
    rows: Vec<(String, String)>,
    normalizer: &TextNormalizer,
) -> Vec<TrainingExample> {
    rows.into_iter()
        .map(|(text, label)| TrainingExample {
            clean: normalizer.normalize(&text),
            text,
            label,
        })
        .collect()
}

/// Upsample every minority class with replacement to the majority count,
/// then shuffle. Per-class counts are equal afterwards, so a second pass
/// with any seed leaves them unchanged.
pub fn balance(examples: Vec<TrainingExample>, seed: u64) -> Vec<TrainingExample> {
    let mut groups: BTreeMap<String, Vec<TrainingExample>> = BTreeMap::new();
    for example in examples {
        groups.entry(example.label.clone()).or_default().push(example);
    }
    let max_count = groups.values().map(Vec::len).max().unwrap_or(0);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut balanced = Vec::with_capacity(max_count * groups.len());
    for (label, group) in &groups {
        if group.len() < max_count {
            for _ in 0..max_count {
                balanced.push(group[rng.gen_range(0..group.len())].clone());
            }
        } else {
            balanced.extend(group.iter().cloned());
        }
        info!(label = %label, count = max_count.max(group.len()), "balanced class");
    }
    balanced.shuffle(&mut rng);
    balanced
}

/// Per-label example counts, sorted by label.
pub fn class_counts(examples: &[TrainingExample]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for example in examples {
        *counts.entry(example.label.clone()).or_insert(0) += 1;
    }
    counts
}

/// The first slice of the sorted joy lexicon, reused as the template fill
/// vocabulary.
fn joy_word_pool() -> Result<Vec<String>> {
    let spec = LexiconSpec::bundled()?;
    let entry = spec
        .emotions
        .get(&Emotion::Joy)
        .ok_or_else(|| Error::config("lexicon has no joy entries to augment from"))?;
    let mut words = entry.words.clone();
    words.sort();
    words.truncate(JOY_WORD_POOL);
    Ok(words)
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    // Callers only pass non-empty constant arrays.
    &items[rng.gen_range(0..items.len())]
}

fn fill(template: &str, value: &str) -> String {
    if template.contains("{}") {
        template.replace("{}", value)
    } else {
        template.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_seed_csv_creates_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emotions.csv");
        assert!(ensure_seed_csv(&path).unwrap());
        assert!(!ensure_seed_csv(&path).unwrap());

        let rows = load_seed_csv(&path).unwrap();
        assert_eq!(rows.len(), 9);
        // Every non-neutral emotion is represented.
        for emotion in Emotion::CANONICAL {
            assert!(rows.iter().any(|(_, label)| label == emotion.as_str()));
        }
    }

    #[test]
    fn test_missing_column_is_fatal_and_named() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "text,sentiment\nhello,joy\n").unwrap();
        let err = load_seed_csv(&path).unwrap_err();
        assert!(err.to_string().contains("label"), "{err}");
    }

    #[test]
    fn test_augment_counts_and_determinism() {
        let config = AugmentConfig::default();
        let rows = augment(&config).unwrap();
        assert_eq!(rows.len(), DEFAULT_JOY_SAMPLES + 5 * DEFAULT_OTHER_SAMPLES);

        let joy = rows.iter().filter(|(_, l)| l == "joy").count();
        assert_eq!(joy, DEFAULT_JOY_SAMPLES);
        let fear = rows.iter().filter(|(_, l)| l == "fear").count();
        assert_eq!(fear, DEFAULT_OTHER_SAMPLES);

        // No unresolved template placeholders escape.
        assert!(rows.iter().all(|(text, _)| !text.contains("{}")));

        // Same seed, same dataset.
        assert_eq!(rows, augment(&config).unwrap());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = augment(&AugmentConfig::default()).unwrap();
        let b = augment(&AugmentConfig {
            seed: 7,
            ..AugmentConfig::default()
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_with_clean_normalizes() {
        let normalizer = TextNormalizer::with_stop_words(["i", "am"]);
        let examples = with_clean(
            vec![("I am SO happy!".to_string(), "joy".to_string())],
            &normalizer,
        );
        assert_eq!(examples[0].clean, "so happy");
        assert_eq!(examples[0].text, "I am SO happy!");
    }

    #[test]
    fn test_balance_equalizes_class_counts() {
        let normalizer = TextNormalizer::with_stop_words(Vec::<String>::new());
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push((format!("joy text {i}"), "joy".to_string()));
        }
        for i in 0..3 {
            rows.push((format!("fear text {i}"), "fear".to_string()));
        }
        let balanced = balance(with_clean(rows, &normalizer), DEFAULT_SEED);

        let counts = class_counts(&balanced);
        assert_eq!(counts["joy"], 10);
        assert_eq!(counts["fear"], 10);
    }

    #[test]
    fn test_balance_is_idempotent_on_counts() {
        let normalizer = TextNormalizer::with_stop_words(Vec::<String>::new());
        let rows = vec![
            ("a".to_string(), "joy".to_string()),
            ("b".to_string(), "joy".to_string()),
            ("c".to_string(), "sadness".to_string()),
        ];
        let once = balance(with_clean(rows, &normalizer), DEFAULT_SEED);
        let counts_once = class_counts(&once);
        let twice = balance(once, 99);
        assert_eq!(counts_once, class_counts(&twice));
    }

    #[test]
    fn test_balance_determinism() {
        let normalizer = TextNormalizer::with_stop_words(Vec::<String>::new());
        let rows: Vec<(String, String)> = (0..20)
            .map(|i| {
                let label = if i % 4 == 0 { "fear" } else { "joy" };
                (format!("text {i}"), label.to_string())
            })
            .collect();
        let a = balance(with_clean(rows.clone(), &normalizer), DEFAULT_SEED);
        let b = balance(with_clean(rows, &normalizer), DEFAULT_SEED);
        assert_eq!(
            a.iter().map(|e| &e.text).collect::<Vec<_>>(),
            b.iter().map(|e| &e.text).collect::<Vec<_>>()
        );
    }
}
