// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the `train` and `inspect` subcommands and their flags.
// `surname-gru train` with no flags runs the baseline setup:
// 30 epochs, batch 256, 2 bidirectional layers of 100 units.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::{self as defaults, TrainConfig};
use crate::ml::model::HiddenPolicy;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the surname classifier and report test accuracy per epoch
    Train(TrainArgs),

    /// Summarise a names dataset file
    Inspect(InspectArgs),
}

/// How the final GRU states feed the output layer
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HiddenPolicyArg {
    /// Forward and backward final states side by side
    Concatenate,
    /// Backward final state twice; the forward state is dropped
    DuplicateLast,
}

impl From<HiddenPolicyArg> for HiddenPolicy {
    fn from(arg: HiddenPolicyArg) -> Self {
        match arg {
            HiddenPolicyArg::Concatenate   => HiddenPolicy::Concatenate,
            HiddenPolicyArg::DuplicateLast => HiddenPolicy::DuplicateLast,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Gzip-compressed `name,country` CSV used for training
    #[arg(long, default_value = defaults::TRAIN_FILE)]
    pub train_file: String,

    /// Gzip-compressed `name,country` CSV used for evaluation
    #[arg(long, default_value = defaults::TEST_FILE)]
    pub test_file: String,

    /// Where train_config.json, metrics.csv and accuracy.svg go
    #[arg(long, default_value = defaults::OUTPUT_DIR)]
    pub output_dir: String,

    #[arg(long, default_value_t = defaults::EPOCHS)]
    pub epochs: usize,

    #[arg(long, default_value_t = defaults::BATCH_SIZE)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = defaults::LEARNING_RATE)]
    pub lr: f64,

    #[arg(long, default_value_t = defaults::EMBEDDING_SIZE)]
    pub embedding_size: usize,

    #[arg(long, default_value_t = defaults::HIDDEN_SIZE)]
    pub hidden_size: usize,

    /// Number of stacked GRU layers
    #[arg(long, default_value_t = defaults::N_LAYER)]
    pub num_layers: usize,

    /// Size of the character alphabet (128 = ASCII)
    #[arg(long, default_value_t = defaults::N_CHARS)]
    pub n_chars: usize,

    /// Run the GRU in the forward direction only
    #[arg(long)]
    pub unidirectional: bool,

    #[arg(long, value_enum, default_value_t = HiddenPolicyArg::Concatenate)]
    pub hidden_policy: HiddenPolicyArg,

    /// Seeds parameter initialisation and the training shuffle
    #[arg(long, default_value_t = defaults::SEED)]
    pub seed: u64,

    /// Name to classify after training (repeatable)
    #[arg(long = "classify", value_name = "NAME")]
    pub classify: Vec<String>,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_file:     a.train_file,
            test_file:      a.test_file,
            output_dir:     a.output_dir,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            lr:             a.lr,
            embedding_size: a.embedding_size,
            hidden_size:    a.hidden_size,
            num_layers:     a.num_layers,
            n_chars:        a.n_chars,
            bidirectional:  !a.unidirectional,
            hidden_policy:  a.hidden_policy.into(),
            seed:           a.seed,
            classify:       a.classify,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Dataset file to summarise
    #[arg(long, default_value = defaults::TRAIN_FILE)]
    pub file: String,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn train_config(args: &[&str]) -> TrainConfig {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Commands::Train(a) => a.into(),
            other => panic!("expected train, got {other:?}"),
        }
    }

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let parsed   = train_config(&["surname-gru", "train"]);
        let expected = TrainConfig::default();
        assert_eq!(parsed.train_file, expected.train_file);
        assert_eq!(parsed.epochs, expected.epochs);
        assert_eq!(parsed.batch_size, expected.batch_size);
        assert_eq!(parsed.lr, expected.lr);
        assert_eq!(parsed.bidirectional, expected.bidirectional);
        assert_eq!(parsed.hidden_policy, expected.hidden_policy);
        assert!(parsed.classify.is_empty());
    }

    #[test]
    fn test_train_flags() {
        let cfg = train_config(&[
            "surname-gru", "train",
            "--unidirectional",
            "--hidden-policy", "duplicate-last",
            "--classify", "Nakamura",
            "--classify", "Kowalski",
            "--epochs", "5",
        ]);
        assert!(!cfg.bidirectional);
        assert_eq!(cfg.hidden_policy, HiddenPolicy::DuplicateLast);
        assert_eq!(cfg.classify, vec!["Nakamura".to_string(), "Kowalski".to_string()]);
        assert_eq!(cfg.epochs, 5);
    }

    #[test]
    fn test_inspect_parses_file() {
        let cli = Cli::try_parse_from(["surname-gru", "inspect", "--file", "x.csv.gz"]).unwrap();
        match cli.command {
            Commands::Inspect(a) => assert_eq!(a.file, "x.csv.gz"),
            other => panic!("expected inspect, got {other:?}"),
        }
    }
}
