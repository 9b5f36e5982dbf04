//! emokit Classifiers
//!
//! The prediction stages of the emotion classifier and the chain that runs
//! them in order:
//! - Lexicon matcher: emoji, exact, and fuzzy dictionary matching
//! - Polarity fallback: compound valence score with keyword disambiguation
//! - Model stage: TF-IDF features into a multinomial linear classifier
//!
//! The first stage to resolve wins; when all abstain the chain answers
//! neutral.

pub mod artifacts;
pub mod chain;
pub mod classifier;
pub mod encoder;
pub mod lexicon;
pub mod linear;
pub mod model;
pub mod polarity;
pub mod similarity;
pub mod vectorizer;

pub use artifacts::ArtifactBundle;
pub use chain::{EmotionPredictor, Prediction, DEFAULT_SOURCE};
pub use classifier::{Classifier, Detection};
pub use encoder::LabelEncoder;
pub use lexicon::{LexiconMatcher, LexiconSpec, DEFAULT_FUZZY_CUTOFF};
pub use linear::{LinearClassifier, DEFAULT_MAX_ITER};
pub use model::ModelClassifier;
pub use polarity::{
    PolarityFallback, PolarityScorer, PolaritySpec, DEFAULT_NEG_THRESHOLD, DEFAULT_POS_THRESHOLD,
};
pub use similarity::similarity_ratio;
pub use vectorizer::{SparseVector, TfidfVectorizer, DEFAULT_MAX_FEATURES};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifacts::ArtifactBundle;
    pub use crate::chain::{EmotionPredictor, Prediction};
    pub use crate::classifier::{Classifier, Detection};
    pub use crate::encoder::LabelEncoder;
    pub use crate::lexicon::LexiconMatcher;
    pub use crate::linear::LinearClassifier;
    pub use crate::model::ModelClassifier;
    pub use crate::polarity::PolarityFallback;
    pub use crate::vectorizer::TfidfVectorizer;
}
