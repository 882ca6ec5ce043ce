//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - runs the classification pipeline
//! - prints reports and writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{ClassifyArgs, Command};
use crate::domain::{ClassifyConfig, ExerciseRoute};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `exodiff` binary.
pub fn run() -> Result<(), AppError> {
    // Before parsing, so `.env` values can feed clap's `env` defaults.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Classify(args) => handle_classify(args, OutputMode::Full),
        Command::Words(args) => handle_classify(args, OutputMode::WordsOnly),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    WordsOnly,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "exo_difficulty=debug"
    } else {
        "exo_difficulty=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_classify(args: ClassifyArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = classify_config_from_args(&args)?;
    let run = pipeline::run_classify(&config)?;
    let classification = &run.classification;

    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format_run_summary(&run.ingest, classification, &config, run.frequency_entries)
            );
            println!("{}", crate::report::format_level_distribution(classification));

            println!("Hardest words:");
            let words = crate::report::hardest_words(classification.table.words(), config.top_n);
            println!("{}", crate::report::format_word_ranking(&words));

            for route in [ExerciseRoute::Word, ExerciseRoute::Sentence] {
                let rows = crate::report::hardest_exercises(&classification.exercises, route, config.top_n);
                if !rows.is_empty() {
                    println!("{}", crate::report::format_exercise_ranking(&rows, route));
                }
            }

            let problems = crate::report::format_problems(&run.ingest.row_errors, &classification.diagnostics);
            if !problems.is_empty() {
                println!("{problems}");
            }
        }
        OutputMode::WordsOnly => {
            print!("{}", crate::report::format_word_ranking(classification.table.words()));
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &classification.exercises)?;
        info!(path = %path.display(), "Wrote labeled exercises");
    }
    if let Some(path) = &config.export_words {
        crate::io::export::write_words_csv(path, classification.table.words())?;
        info!(path = %path.display(), "Wrote word table CSV");
    }
    if let Some(path) = &config.export_table {
        crate::io::table::write_table_json(path, &classification.table, &config.language)?;
        info!(path = %path.display(), "Wrote word table JSON");
    }

    Ok(())
}

pub fn classify_config_from_args(args: &ClassifyArgs) -> Result<ClassifyConfig, AppError> {
    if args.quantiles == 0 {
        return Err(AppError::new(2, "--quantiles must be at least 1."));
    }
    let clean = |tags: &[String]| -> Vec<String> {
        tags.iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    };
    let word_objectives = clean(&args.word_objectives);
    let sentence_objectives = clean(&args.sentence_objectives);
    if word_objectives.is_empty() && sentence_objectives.is_empty() {
        return Err(AppError::new(2, "At least one word or sentence objective is required."));
    }

    Ok(ClassifyConfig {
        input_path: args.input.clone(),
        frequency_path: args.frequencies.clone(),
        language: args.language.trim().to_string(),
        word_objectives,
        sentence_objectives,
        quantiles: args.quantiles,
        score_basis: args.score_basis,
        length_normalization: args.length_normalization,
        top_n: args.top,
        export_results: args.export.clone(),
        export_words: args.export_words.clone(),
        export_table: args.export_table.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn args(extra: &[&str]) -> ClassifyArgs {
        let mut argv = vec!["exodiff", "classify", "exos.csv", "--freq", "zipf.csv"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Classify(args) => args,
            Command::Words(_) => unreachable!(),
        }
    }

    #[test]
    fn zero_quantiles_is_a_usage_error() {
        let err = classify_config_from_args(&args(&["--quantiles", "0"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn blank_objectives_are_dropped() {
        let config = classify_config_from_args(&args(&["--word-objective", "  Vocab ", "--word-objective", " "])).unwrap();
        assert_eq!(config.word_objectives, vec!["Vocab"]);
        assert_eq!(config.sentence_objectives.len(), 3);
    }
}
