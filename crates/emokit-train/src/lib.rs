//! emokit Training
//!
//! Everything between a seed CSV and a saved artifact bundle: template
//! augmentation, upsample balancing, a stratified split, the trainer, and
//! the evaluation report. All stochastic steps are seeded.

pub mod dataset;
pub mod trainer;

pub use dataset::{
    augment, balance, class_counts, ensure_seed_csv, load_seed_csv, with_clean, AugmentConfig,
    TrainingExample, DEFAULT_JOY_SAMPLES, DEFAULT_OTHER_SAMPLES, DEFAULT_SEED,
};
pub use trainer::{
    train, ClassMetrics, TrainConfig, TrainingReport, DEFAULT_TEST_FRACTION,
};
