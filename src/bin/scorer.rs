use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;

use wsd_core::corpus;
use wsd_core::evaluate::{evaluate, parse_answers};
use wsd_core::WsdConfig;

/// Score a predictions stream against a gold key
#[derive(Parser)]
#[command(name = "scorer", version)]
struct Cli {
    /// Predicted answers, one `<answer .../>` per line
    answers: PathBuf,

    /// Gold key in the same format
    key: PathBuf,

    /// JSON configuration file (for the sense label set)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
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

    match score(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn score(cli: &Cli) -> Result<()> {
    let config = WsdConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let senses = config.sense_set()?;

    let predicted = parse_answers(&corpus::read_file(&cli.answers)?, "answers")
        .with_context(|| format!("reading {}", cli.answers.display()))?;
    let gold = parse_answers(&corpus::read_file(&cli.key)?, "key")
        .with_context(|| format!("reading {}", cli.key.display()))?;

    let evaluation = evaluate(&predicted, &gold, &senses)?;

    println!("{}", evaluation.accuracy());
    println!("{}", evaluation.render_matrix());
    for mismatch in &evaluation.mismatches {
        eprintln!(
            "{} {} label '{}' on instance '{}' is not a configured sense",
            "warning:".yellow().bold(),
            mismatch.side,
            mismatch.label,
            mismatch.instance
        );
    }
    Ok(())
}
