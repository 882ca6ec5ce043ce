//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during scoring
//! - exported to JSON/CSV
//! - reused by alternative front-ends without touching the scoring core

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default number of equal-frequency bins used for leveling.
pub const DEFAULT_QUANTILES: usize = 32;

/// Objectives routed to the word path by default.
pub const DEFAULT_WORD_OBJECTIVES: [&str; 1] = ["Learning vocabulary"];

/// Objectives routed to the sentence path by default.
pub const DEFAULT_SENTENCE_OBJECTIVES: [&str; 3] = ["Useful Sentences", "Grammar", "Verb_Conjugation"];

/// CEFR-style label, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 5] = [
        DifficultyLevel::A1,
        DifficultyLevel::A2,
        DifficultyLevel::B1,
        DifficultyLevel::B2,
        DifficultyLevel::C1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::A1 => "A1",
            DifficultyLevel::A2 => "A2",
            DifficultyLevel::B1 => "B1",
            DifficultyLevel::B2 => "B2",
            DifficultyLevel::C1 => "C1",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which per-word score feeds the word-average aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBasis {
    /// `relativeLength * relativeRarity`, stable across corpora of similar shape.
    Raw,
    /// The Box–Cox transformed score, shifted so the table minimum is just
    /// above zero. Tokens excluded from the fit do not contribute.
    Transformed,
}

/// Where the sentence-length denominator comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LengthNormalization {
    /// Longest token count among the sentence exercises.
    SentenceLengths,
    /// Largest word-exercise average score (falls back to sentence lengths
    /// when there are no word exercises).
    WordExerciseScores,
}

/// Which path an exercise is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseRoute {
    Word,
    Sentence,
}

/// One input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exercise {
    /// Source line (1-based, header is line 1) when read from a file.
    pub line: usize,
    pub id: Option<String>,
    pub objective: String,
    pub full_sentence: String,
    /// Hyphen-delimited answer alternatives.
    pub propositions: Option<String>,
    pub right_answer_id: Option<usize>,
    /// Precomputed correct answer text, used when propositions are absent.
    pub right_answer: Option<String>,
}

/// Difficulty record for one unique (lowercased) token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDifficulty {
    pub token: String,
    pub length: usize,
    pub frequency: f64,
    pub raw_score: f64,
    /// `None` when the raw score was excluded from the power transform.
    pub transformed_score: Option<f64>,
    pub quantile_rank: usize,
    pub level: DifficultyLevel,
}

/// Derived columns for a word-path row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WordExerciseScores {
    /// Average word score over the item's tokens.
    pub score: Option<f64>,
    /// Token score when the item is a single known token.
    pub target_word_score: Option<f64>,
    /// Token-level label when the item is a single known token.
    pub word_level: Option<DifficultyLevel>,
}

/// Derived columns for a sentence-path row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentenceExerciseScores {
    pub right_answer: String,
    pub sentence_length: usize,
    pub target_word_length: usize,
    pub longest_word_length: usize,
    pub target_word_score: Option<f64>,
    pub rarest_word_score: f64,
    pub sentence_average: Option<f64>,
    pub sentence_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DerivedScores {
    Word(WordExerciseScores),
    Sentence(SentenceExerciseScores),
}

/// An input row plus everything the classifier computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExercise {
    pub exercise: Exercise,
    pub route: ExerciseRoute,
    pub scores: DerivedScores,
    pub quantile_rank: Option<usize>,
    pub level: Option<DifficultyLevel>,
}

impl LabeledExercise {
    /// The score that was binned to produce `level`.
    pub fn binned_score(&self) -> Option<f64> {
        match &self.scores {
            DerivedScores::Word(w) => w.score,
            DerivedScores::Sentence(s) => s.sentence_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Answer index out of range; row excluded from the output.
    MalformedPropositions,
    /// No token of the scored text is in the word table; row kept unlabeled.
    EmptyAverage,
    /// Objective in neither list; row excluded from the output.
    Unrouted,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::MalformedPropositions => "malformed-propositions",
            DiagnosticKind::EmptyAverage => "empty-average",
            DiagnosticKind::Unrouted => "unrouted",
        }
    }

    pub fn excludes_row(self) -> bool {
        matches!(self, DiagnosticKind::MalformedPropositions | DiagnosticKind::Unrouted)
    }
}

/// A row-level problem found during classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiagnostic {
    pub line: usize,
    pub id: Option<String>,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// A saved word table (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordTableFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub language: String,
    /// Box–Cox parameter; `None` when every score was excluded.
    pub lambda: Option<f64>,
    pub bins: usize,
    pub words: Vec<WordDifficulty>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env`).
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    pub input_path: PathBuf,
    pub frequency_path: PathBuf,
    pub language: String,
    pub word_objectives: Vec<String>,
    pub sentence_objectives: Vec<String>,
    pub quantiles: usize,
    pub score_basis: ScoreBasis,
    pub length_normalization: LengthNormalization,
    pub top_n: usize,

    pub export_results: Option<PathBuf>,
    pub export_words: Option<PathBuf>,
    pub export_table: Option<PathBuf>,
}

/// The subset of `ClassifyConfig` the scoring core needs.
#[derive(Debug, Clone)]
pub struct ScoringOptions {
    pub language: String,
    pub word_objectives: Vec<String>,
    pub sentence_objectives: Vec<String>,
    pub quantiles: usize,
    pub score_basis: ScoreBasis,
    pub length_normalization: LengthNormalization,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            word_objectives: DEFAULT_WORD_OBJECTIVES.iter().map(|s| s.to_string()).collect(),
            sentence_objectives: DEFAULT_SENTENCE_OBJECTIVES.iter().map(|s| s.to_string()).collect(),
            quantiles: DEFAULT_QUANTILES,
            score_basis: ScoreBasis::Raw,
            length_normalization: LengthNormalization::SentenceLengths,
        }
    }
}

impl From<&ClassifyConfig> for ScoringOptions {
    fn from(config: &ClassifyConfig) -> Self {
        Self {
            language: config.language.clone(),
            word_objectives: config.word_objectives.clone(),
            sentence_objectives: config.sentence_objectives.clone(),
            quantiles: config.quantiles,
            score_basis: config.score_basis,
            length_normalization: config.length_normalization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_easiest_first() {
        let mut sorted = DifficultyLevel::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, DifficultyLevel::ALL.to_vec());
        assert!(DifficultyLevel::A1 < DifficultyLevel::C1);
    }
}
