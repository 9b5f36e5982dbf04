mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use emokit_classifiers::{
    ArtifactBundle, Classifier, EmotionPredictor, LexiconMatcher, LexiconSpec, ModelClassifier,
    PolarityFallback, PolaritySpec, Prediction,
};
use emokit_core::TextNormalizer;
use emokit_train::{AugmentConfig, TrainConfig};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            artifacts_dir,
            seed,
            joy_samples,
            other_samples,
            max_features,
            force,
            verbose,
        } => {
            init_logging(verbose);

            if !force && ArtifactBundle::exists(&artifacts_dir) {
                match ArtifactBundle::load(&artifacts_dir) {
                    Ok(_) => {
                        println!(
                            "Reusing artifact bundle in {} (pass --force to retrain)",
                            artifacts_dir.display()
                        );
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::warn!("existing artifact bundle is unusable, retraining: {e}");
                    }
                }
            }

            emokit_train::ensure_seed_csv(&data)?;
            let mut rows = emokit_train::load_seed_csv(&data)?;
            rows.extend(emokit_train::augment(&AugmentConfig {
                joy_samples,
                other_samples,
                seed,
            })?);

            let normalizer = TextNormalizer::new();
            let examples = emokit_train::balance(
                emokit_train::with_clean(rows, &normalizer),
                seed,
            );

            println!("Class counts after augmentation and balancing:");
            for (label, count) in emokit_train::class_counts(&examples) {
                println!("  {label:<10} {count}");
            }

            let config = TrainConfig {
                max_features,
                seed,
                ..TrainConfig::default()
            };
            let (bundle, report) = emokit_train::train(&examples, &config)?;
            println!("\n{report}");

            bundle.save(&artifacts_dir)?;
            println!("Saved artifact bundle to {}", artifacts_dir.display());
        }

        Commands::Predict {
            texts,
            artifacts_dir,
            top_k,
            cutoff,
            pos_threshold,
            neg_threshold,
            verbose,
        } => {
            init_logging(verbose);

            let mut stages: Vec<Arc<dyn Classifier>> = vec![
                Arc::new(LexiconMatcher::with_spec(
                    LexiconSpec::bundled()?,
                    TextNormalizer::new(),
                    cutoff,
                )?),
                Arc::new(PolarityFallback::with_spec(
                    PolaritySpec::bundled()?,
                    pos_threshold,
                    neg_threshold,
                )),
            ];
            if let Some(bundle) = load_bundle_if_present(&artifacts_dir)? {
                stages.push(Arc::new(ModelClassifier::new(bundle)));
            }
            let predictor = EmotionPredictor::new(stages);

            for text in &texts {
                let prediction = predictor.predict(text).await?;
                print_prediction(text, &prediction, top_k);
            }
        }

        Commands::Repl {
            artifacts_dir,
            top_k,
            verbose,
        } => {
            init_logging(verbose);

            let bundle = load_bundle_if_present(&artifacts_dir)?;
            if bundle.is_none() {
                println!(
                    "No artifact bundle in {}; running with lexicon and polarity stages only",
                    artifacts_dir.display()
                );
            }
            let predictor = EmotionPredictor::with_defaults(bundle)?;

            println!("Type a sentence to classify it, or exit/quit to leave.");
            let stdin = std::io::stdin();
            loop {
                print!("> ");
                std::io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                    break;
                }
                let prediction = predictor.predict(line).await?;
                print_prediction(line, &prediction, top_k);
            }
        }
    }

    Ok(())
}

fn load_bundle_if_present(dir: &Path) -> anyhow::Result<Option<Arc<ArtifactBundle>>> {
    if !ArtifactBundle::exists(dir) {
        return Ok(None);
    }
    let bundle = ArtifactBundle::load(dir)
        .with_context(|| format!("loading artifact bundle from {}", dir.display()))?;
    Ok(Some(Arc::new(bundle)))
}

fn print_prediction(text: &str, prediction: &Prediction, top_k: usize) {
    println!("{text:?} -> {} [{}]", prediction.emotion, prediction.source);
    if let Some(probabilities) = &prediction.probabilities {
        let mut ranked: Vec<(&String, &f64)> = probabilities.iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (label, probability) in ranked.into_iter().take(top_k) {
            println!("    {label:<10} {probability:.4}");
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "emokit_core=debug,emokit_classifiers=debug,emokit_train=debug,emokit_cli=debug"
    } else {
        "emokit_core=info,emokit_classifiers=info,emokit_train=info,emokit_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
