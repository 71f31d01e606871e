use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use tracing::{info, warn};

use wsd_core::core::types::Prediction;
use wsd_core::corpus::{self, Labeling};
use wsd_core::persistence;
use wsd_core::stopwords::{StopWordList, StopWords};
use wsd_core::{DecisionList, WsdConfig, WsdEngine};

/// Decision-list word sense disambiguation
#[derive(Parser)]
#[command(name = "wsd", version)]
#[command(about = "Train a decision list on a labeled corpus and tag an unlabeled one")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train, write the model report, and tag the test corpus
    Run(RunArgs),
    /// Train only; write the report and optionally a binary snapshot
    Train(TrainArgs),
    /// Tag a corpus with a saved model snapshot
    Tag(TagArgs),
    /// Print the default configuration as JSON
    #[command(name = "print-config")]
    PrintConfig,
}

#[derive(Args)]
struct CommonArgs {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop-word list, one word per line (default: built-in English list)
    #[arg(long)]
    stopwords: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    train: PathBuf,
    test: PathBuf,
    /// Where the human-readable model report goes
    model_report: PathBuf,

    /// Answers file (default: stdout)
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Tag every instance with the most frequent training sense
    #[arg(long)]
    baseline: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct TrainArgs {
    train: PathBuf,

    #[arg(long)]
    report: PathBuf,

    /// Binary model snapshot for later `tag` runs
    #[arg(long)]
    save: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct TagArgs {
    test: PathBuf,

    #[arg(long)]
    model: PathBuf,

    #[arg(long)]
    answers: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run(args),
        Commands::Train(args) => train(args),
        Commands::Tag(args) => tag(args),
        Commands::PrintConfig => {
            println!("{}", WsdConfig::default().to_json()?);
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let engine = build_engine(&args.common)?;
    let model = train_model(&engine, &args.train)?;
    persistence::save_report(&model, &args.model_report)
        .with_context(|| format!("writing model report {}", args.model_report.display()))?;

    let text = corpus::read_file(&args.test)?;
    let predictions = if args.baseline {
        let ingested = engine.ingest(&text, Labeling::Unlabeled);
        engine.baseline(&model, &ingested.instances)
    } else {
        engine.tag(&model, &text)
    };
    emit_answers(&predictions, args.answers.as_deref())
}

fn train(args: TrainArgs) -> Result<()> {
    let engine = build_engine(&args.common)?;
    let model = train_model(&engine, &args.train)?;
    persistence::save_report(&model, &args.report)
        .with_context(|| format!("writing model report {}", args.report.display()))?;
    if let Some(path) = &args.save {
        persistence::save_model(&model, path)
            .with_context(|| format!("saving model snapshot {}", path.display()))?;
        info!(path = %path.display(), "model snapshot saved");
    }
    Ok(())
}

fn tag(args: TagArgs) -> Result<()> {
    let engine = build_engine(&args.common)?;
    let model = persistence::load_model(&args.model)
        .with_context(|| format!("loading model snapshot {}", args.model.display()))?;
    if model.senses().labels() != engine.config().senses.as_slice() {
        warn!(
            model = ?model.senses().labels(),
            config = ?engine.config().senses,
            "snapshot senses differ from the configured senses; tagging with the snapshot's"
        );
    }
    let text = corpus::read_file(&args.test)?;
    let predictions = engine.tag(&model, &text);
    emit_answers(&predictions, args.answers.as_deref())
}

fn build_engine(common: &CommonArgs) -> Result<WsdEngine> {
    let config = WsdConfig::load(common.config.as_deref()).context("loading configuration")?;
    let stop_words: Arc<dyn StopWords> = match &common.stopwords {
        Some(path) => Arc::new(StopWordList::from_file(path)?),
        None => Arc::new(StopWordList::english()),
    };
    Ok(WsdEngine::new(config, stop_words)?)
}

fn train_model(engine: &WsdEngine, path: &Path) -> Result<DecisionList> {
    let text = corpus::read_file(path)?;
    engine
        .train(&text)
        .with_context(|| format!("training on {}", path.display()))
}

fn emit_answers(predictions: &[Prediction], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut buffer = Vec::new();
            persistence::write_answers(predictions, &mut buffer)?;
            persistence::write_atomic(path, &buffer)
                .with_context(|| format!("writing answers {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            persistence::write_answers(predictions, BufWriter::new(stdout.lock()))?;
        }
    }
    info!(answers = predictions.len(), "tagging complete");
    Ok(())
}
