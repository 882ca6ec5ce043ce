//! Command-line parsing for the exercise difficulty classifier.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scoring code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{
    DEFAULT_QUANTILES, DEFAULT_SENTENCE_OBJECTIVES, DEFAULT_WORD_OBJECTIVES, LengthNormalization,
    ScoreBasis,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "exodiff", version, about = "CEFR-style difficulty labels for language exercises")]
pub struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Label every exercise, print the summary and optionally export results.
    Classify(ClassifyArgs),
    /// Print the word difficulty ranking only (useful for scripting).
    Words(ClassifyArgs),
}

/// Common options for classifying and ranking.
#[derive(Debug, Parser, Clone)]
pub struct ClassifyArgs {
    /// Exercise dataset (CSV with `exo_objective` and `full_sentence` columns).
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Zipf frequency table (CSV with `word` and `zipf` columns).
    #[arg(long = "freq", value_name = "CSV", env = "EXODIFF_FREQ")]
    pub frequencies: PathBuf,

    /// Language code passed to the tokenizer and frequency lookups.
    #[arg(short = 'l', long, default_value = "en", env = "EXODIFF_LANGUAGE")]
    pub language: String,

    /// Objective routed to the word path (repeatable).
    #[arg(long = "word-objective", value_name = "TAG", default_values = DEFAULT_WORD_OBJECTIVES)]
    pub word_objectives: Vec<String>,

    /// Objective routed to the sentence path (repeatable).
    #[arg(long = "sentence-objective", value_name = "TAG", default_values = DEFAULT_SENTENCE_OBJECTIVES)]
    pub sentence_objectives: Vec<String>,

    /// Number of equal-frequency bins.
    #[arg(short = 'q', long, default_value_t = DEFAULT_QUANTILES)]
    pub quantiles: usize,

    /// Which word score feeds the sentence and word-exercise averages.
    #[arg(long, value_enum, default_value_t = ScoreBasis::Raw)]
    pub score_basis: ScoreBasis,

    /// Source of the sentence-length denominator.
    #[arg(long = "length-norm", value_enum, default_value_t = LengthNormalization::SentenceLengths)]
    pub length_normalization: LengthNormalization,

    /// Show top-N hardest words and exercises.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Export labeled exercises to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the word difficulty table to CSV.
    #[arg(long = "export-words")]
    pub export_words: Option<PathBuf>,

    /// Export the word difficulty table (plus transform parameters) to JSON.
    #[arg(long = "export-table")]
    pub export_table: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dataset_conventions() {
        let cli = Cli::parse_from(["exodiff", "classify", "exos.csv", "--freq", "zipf.csv"]);
        let Command::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert!(!cli.verbose);
        assert_eq!(args.word_objectives, vec!["Learning vocabulary"]);
        assert_eq!(args.sentence_objectives.len(), 3);
        assert_eq!(args.quantiles, 32);
        assert_eq!(args.score_basis, ScoreBasis::Raw);
        assert_eq!(args.length_normalization, LengthNormalization::SentenceLengths);
    }

    #[test]
    fn repeatable_objectives_replace_defaults() {
        let cli = Cli::parse_from([
            "exodiff",
            "words",
            "exos.csv",
            "--freq",
            "zipf.csv",
            "--word-objective",
            "Vocab",
            "--word-objective",
            "Lexicon",
            "--length-norm",
            "word-exercise-scores",
            "-v",
        ]);
        let Command::Words(args) = cli.command else {
            panic!("expected words");
        };
        assert!(cli.verbose);
        assert_eq!(args.word_objectives, vec!["Vocab", "Lexicon"]);
        assert_eq!(args.length_normalization, LengthNormalization::WordExerciseScores);
    }
}
