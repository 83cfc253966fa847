use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use tingia::{ArtifactStore, CredibilityClassifier, PredictionVerdict, TextNormalizer};

#[derive(Parser)]
#[command(author, version, about = "Vietnamese news normalizer and credibility classifier", long_about = None)]
struct Args {
    /// Artifacts directory (defaults to $TINGIA_ARTIFACTS or the user data directory)
    #[arg(short, long, global = true)]
    artifacts: Option<PathBuf>,

    /// Extra compound words for the segmenter, one per line
    #[arg(short, long, global = true)]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the normalized form of TEXT, or of stdin when TEXT is omitted
    Normalize {
        /// Keep stopwords in the output
        #[arg(long)]
        keep_stopwords: bool,
        text: Option<String>,
    },
    /// Evaluate the credibility of an article
    Evaluate {
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
}

fn build_normalizer(lexicon: Option<&PathBuf>) -> Result<TextNormalizer> {
    let mut builder = TextNormalizer::builder();
    if let Some(path) = lexicon {
        builder = builder
            .with_lexicon_file(path)
            .with_context(|| format!("Failed to load lexicon {:?}", path))?;
    }
    Ok(builder.build())
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
    Ok(text)
}

fn print_verdict(verdict: &PredictionVerdict) {
    println!("Label:       {} ({})", verdict.credibility_label, verdict.label);
    println!("Confidence:  {:.1}%", verdict.confidence_score * 100.0);
    println!("Fake:        {}", verdict.is_fake);
    println!("Probabilities:");
    println!("  Real: {:.1}%", verdict.probabilities.real * 100.0);
    println!("  Fake: {:.1}%", verdict.probabilities.fake * 100.0);
    println!("Preprocessed: {}", verdict.preprocessed_text);
}

fn main() -> Result<()> {
    tingia::init_logger();
    let args = Args::parse();
    let normalizer = build_normalizer(args.lexicon.as_ref())?;

    match args.command {
        Command::Normalize { keep_stopwords, text } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            println!("{}", normalizer.normalize(&text, !keep_stopwords));
        }
        Command::Evaluate { title, content, json } => {
            let store = match args.artifacts {
                Some(dir) => ArtifactStore::new(dir),
                None => ArtifactStore::new_default(),
            };

            let start_time = Instant::now();
            info!("Loading artifacts from {:?}", store.artifacts_dir());
            let classifier = CredibilityClassifier::builder()
                .with_normalizer(normalizer.into())
                .with_artifact_store(&store)
                .and_then(|builder| builder.build())
                .with_context(|| format!("Failed to load artifacts from {:?}", store.artifacts_dir()))?;
            info!("Classifier ready (took {:.2?})", start_time.elapsed());

            let verdict = classifier.evaluate(&title, &content)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                print_verdict(&verdict);
            }
        }
    }

    Ok(())
}
