use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "emokit")]
#[command(author, version, about = "Short-text emotion classifier")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dataset, train the model, and save the artifact bundle
    Train {
        /// Seed dataset CSV (created with a minimal set when absent)
        #[arg(short, long, default_value = "emotions.csv")]
        data: PathBuf,

        /// Directory for the saved artifact bundle
        #[arg(short, long, default_value = "artifacts")]
        artifacts_dir: PathBuf,

        /// RNG seed for augmentation, balancing, and the split
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Generated joy samples
        #[arg(long, default_value = "300")]
        joy_samples: usize,

        /// Generated samples per non-joy class
        #[arg(long, default_value = "200")]
        other_samples: usize,

        /// Vocabulary cap for the TF-IDF vectorizer
        #[arg(long, default_value = "12000")]
        max_features: usize,

        /// Retrain even when a usable artifact bundle already exists
        #[arg(short, long)]
        force: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify one or more texts
    Predict {
        /// Texts to classify
        #[arg(required = true)]
        texts: Vec<String>,

        /// Directory holding the trained artifact bundle
        #[arg(short, long, default_value = "artifacts")]
        artifacts_dir: PathBuf,

        /// Show the top K model probabilities
        #[arg(short = 'k', long, default_value = "3")]
        top_k: usize,

        /// Similarity cutoff for the fuzzy lexicon stages
        #[arg(long, default_value = "0.72")]
        cutoff: f64,

        /// Positive polarity threshold
        #[arg(long, default_value = "0.55")]
        pos_threshold: f64,

        /// Negative polarity threshold
        #[arg(long, default_value = "-0.55")]
        neg_threshold: f64,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Interactive classification loop (exit or quit to leave)
    Repl {
        /// Directory holding the trained artifact bundle
        #[arg(short, long, default_value = "artifacts")]
        artifacts_dir: PathBuf,

        /// Show the top K model probabilities
        #[arg(short = 'k', long, default_value = "3")]
        top_k: usize,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}
