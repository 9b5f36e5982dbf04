//! Error types for emokit

/// Result type alias using emokit's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for emokit operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Training data validation errors (malformed CSV, missing columns)
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Training/fitting errors (degenerate inputs, failed convergence setup)
    #[error("training error: {0}")]
    Training(String),

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Artifact persistence errors
    #[error("artifact error: {0}")]
    Artifact(String),

    /// A classifier stage was invoked before its artifacts were loaded
    #[error("not ready: {0}")]
    NotReady(String),

    /// Configuration errors (lexicon/valence resources)
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration parse errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV parse errors
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a new training error
    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new not-ready error
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
