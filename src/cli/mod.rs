// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. All work is
// delegated to Layer 2 (application).
//
//   1. `train`   ── trains the classifier, prints per-epoch accuracy
//   2. `inspect` ── prints a summary of one dataset file
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "surname-gru",
    version,
    about = "Train a character-level bidirectional GRU that classifies surnames by country."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;
    use crate::infra::metrics::best_epoch;

    let use_case = TrainUseCase::new(args.into());
    let report   = use_case.execute()?;

    if let Some(best) = best_epoch(&report.history) {
        println!(
            "Best epoch {} of {}: {:.2}% test accuracy",
            best.epoch,
            report.history.len(),
            best.accuracy * 100.0
        );
    }

    for p in &report.predictions {
        println!("{:<20} {:<12} ({:.1}%)", p.name, p.country, p.confidence * 100.0);
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let summary = InspectUseCase::new(args.file.clone()).execute()?;

    println!("File:         {}", args.file);
    println!("Records:      {}", summary.records);
    println!("Countries:    {}", summary.country_count());
    println!("Longest name: {}", summary.longest_name);
    for (country, n) in &summary.countries {
        println!("  {:<16} {:>6}", country, n);
    }
    Ok(())
}
