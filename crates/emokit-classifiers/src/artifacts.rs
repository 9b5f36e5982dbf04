//! Trained artifact bundle persistence.
//!
//! The bundle is three independent JSON artifacts (vectorizer, model, label
//! encoder) in one directory. A loaded bundle is read-only for the rest of
//! the process lifetime.

use crate::encoder::LabelEncoder;
use crate::linear::LinearClassifier;
use crate::vectorizer::TfidfVectorizer;
use emokit_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

const VECTORIZER_FILE: &str = "vectorizer_emotion.json";
const MODEL_FILE: &str = "model_emotion.json";
const ENCODER_FILE: &str = "label_encoder_emotion.json";

/// The trained triple: vectorizer, classifier, label encoder.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub vectorizer: TfidfVectorizer,
    pub model: LinearClassifier,
    pub encoder: LabelEncoder,
}

impl ArtifactBundle {
    /// Persist all three artifacts into `dir`, creating it if needed.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        write_artifact(&dir.join(VECTORIZER_FILE), &self.vectorizer)?;
        write_artifact(&dir.join(MODEL_FILE), &self.model)?;
        write_artifact(&dir.join(ENCODER_FILE), &self.encoder)?;
        info!(dir = %dir.display(), "saved artifact bundle");
        Ok(())
    }

    /// Load all three artifacts from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let bundle = Self {
            vectorizer: read_artifact(&dir.join(VECTORIZER_FILE))?,
            model: read_artifact(&dir.join(MODEL_FILE))?,
            encoder: read_artifact(&dir.join(ENCODER_FILE))?,
        };
        info!(
            dir = %dir.display(),
            classes = bundle.encoder.len(),
            features = bundle.vectorizer.vocabulary_size(),
            "loaded artifact bundle"
        );
        Ok(bundle)
    }

    /// Whether `dir` holds a complete bundle.
    pub fn exists(dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        [VECTORIZER_FILE, MODEL_FILE, ENCODER_FILE]
            .iter()
            .all(|f| dir.join(f).is_file())
    }
}

fn write_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::artifact(format!("cannot create {}: {e}", path.display())))?;
    serde_json::to_writer(BufWriter::new(file), artifact)?;
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| Error::artifact(format!("cannot open {}: {e}", path.display())))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
