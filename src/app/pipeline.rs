//! Shared "classify pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! frequency table -> exercise ingest -> corpus + word table -> labeled exercises
//!
//! The subcommands can then focus on presentation.

use tracing::info;

use crate::domain::{ClassifyConfig, ScoringOptions};
use crate::error::AppError;
use crate::io::ingest::{IngestedExercises, load_exercises};
use crate::lexicon::{FrequencyProvider, FrequencyTable, RegexTokenizer, Tokenizer};
use crate::scoring::{Classification, ExerciseClassifier};

/// All computed outputs of a single `exodiff classify` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedExercises,
    pub frequency_entries: usize,
    pub classification: Classification,
}

/// Execute the full pipeline from the files named in `config`.
pub fn run_classify(config: &ClassifyConfig) -> Result<RunOutput, AppError> {
    // 1) Frequency table.
    let frequencies = FrequencyTable::load(&config.frequency_path)?;
    if frequencies.is_empty() {
        return Err(AppError::new(
            3,
            format!("Frequency table '{}' has no usable rows.", config.frequency_path.display()),
        ));
    }

    // 2) Exercises.
    let ingest = load_exercises(&config.input_path)?;
    info!(
        rows_read = ingest.rows_read,
        rows_used = ingest.rows_used,
        frequencies = frequencies.len(),
        "Loaded inputs"
    );

    // 3) Classify.
    let tokenizer = RegexTokenizer::new()?;
    let classification = run_classify_with(&ingest, &tokenizer, &frequencies, config)?;

    Ok(RunOutput {
        frequency_entries: frequencies.len(),
        ingest,
        classification,
    })
}

/// Classify already-ingested exercises with the given collaborators.
///
/// Useful when the tokenizer or frequency source is not the bundled one.
pub fn run_classify_with(
    ingest: &IngestedExercises,
    tokenizer: &dyn Tokenizer,
    frequencies: &dyn FrequencyProvider,
    config: &ClassifyConfig,
) -> Result<Classification, AppError> {
    let options = ScoringOptions::from(config);
    let classification = ExerciseClassifier::new(tokenizer, frequencies, &options).classify(&ingest.exercises)?;
    Ok(classification)
}
