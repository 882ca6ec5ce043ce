//! Exercise classification pipeline.
//!
//! Runs in two phases. Phase one is global: route rows, resolve correct
//! answers, collect the corpus and build the immutable word table. Phase two
//! is per row (parallel) and only reads the table plus the batch-wide length
//! denominator, so row results never depend on evaluation order.
//!
//! Word and sentence exercises are binned separately, each against fresh
//! quantile edges over its own score distribution.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{
    DerivedScores, DiagnosticKind, DifficultyLevel, Exercise, ExerciseRoute, LabeledExercise,
    LengthNormalization, RowDiagnostic, ScoringOptions, WordExerciseScores,
};
use crate::error::ScoringError;
use crate::lexicon::{FrequencyProvider, Tokenizer};
use crate::scoring::corpus::TokenCorpus;
use crate::scoring::level::level_for;
use crate::scoring::quantile::QuantileBins;
use crate::scoring::sentence::{SentenceScorer, right_answer, sanitize_denominator};
use crate::scoring::table::WordDifficultyTable;

#[derive(Debug, Clone)]
pub struct Classification {
    pub table: WordDifficultyTable,
    /// Word rows first, then sentence rows, each in input order.
    pub exercises: Vec<LabeledExercise>,
    /// Ordered by source line.
    pub diagnostics: Vec<RowDiagnostic>,
    pub word_bins: usize,
    pub sentence_bins: usize,
    /// `None` when there were no sentence rows to score.
    pub length_denominator: Option<f64>,
}

impl Classification {
    pub fn word_exercises(&self) -> impl Iterator<Item = &LabeledExercise> {
        self.exercises.iter().filter(|e| e.route == ExerciseRoute::Word)
    }

    pub fn sentence_exercises(&self) -> impl Iterator<Item = &LabeledExercise> {
        self.exercises.iter().filter(|e| e.route == ExerciseRoute::Sentence)
    }
}

/// A sentence row with its resolved answer text.
struct SentenceRow<'e> {
    exercise: &'e Exercise,
    answer: Option<String>,
}

pub struct ExerciseClassifier<'a> {
    tokenizer: &'a dyn Tokenizer,
    frequencies: &'a dyn FrequencyProvider,
    options: &'a ScoringOptions,
}

impl<'a> ExerciseClassifier<'a> {
    pub fn new(
        tokenizer: &'a dyn Tokenizer,
        frequencies: &'a dyn FrequencyProvider,
        options: &'a ScoringOptions,
    ) -> Self {
        Self {
            tokenizer,
            frequencies,
            options,
        }
    }

    /// Word objectives win when a tag is in both lists.
    pub fn route(&self, objective: &str) -> Option<ExerciseRoute> {
        let objective = objective.trim();
        if self.options.word_objectives.iter().any(|o| o.trim() == objective) {
            Some(ExerciseRoute::Word)
        } else if self.options.sentence_objectives.iter().any(|o| o.trim() == objective) {
            Some(ExerciseRoute::Sentence)
        } else {
            None
        }
    }

    pub fn classify(&self, exercises: &[Exercise]) -> Result<Classification, ScoringError> {
        let language = self.options.language.as_str();
        let mut diagnostics = Vec::new();

        // Routing and answer resolution.
        let mut word_rows: Vec<&Exercise> = Vec::new();
        let mut sentence_rows: Vec<SentenceRow<'_>> = Vec::new();
        for exercise in exercises {
            match self.route(&exercise.objective) {
                Some(ExerciseRoute::Word) => word_rows.push(exercise),
                Some(ExerciseRoute::Sentence) => match resolve_answer(exercise) {
                    Ok(answer) => sentence_rows.push(SentenceRow { exercise, answer }),
                    Err(err) => diagnostics.push(diagnostic(
                        exercise,
                        DiagnosticKind::MalformedPropositions,
                        err.to_string(),
                    )),
                },
                None => diagnostics.push(diagnostic(
                    exercise,
                    DiagnosticKind::Unrouted,
                    format!("objective '{}' is not a word or sentence objective", exercise.objective),
                )),
            }
        }
        debug!(
            word_rows = word_rows.len(),
            sentence_rows = sentence_rows.len(),
            skipped = diagnostics.len(),
            "Routed exercises"
        );

        // Corpus and word table. Answers are included so every text that gets
        // aggregated later has table entries.
        let texts = word_rows
            .iter()
            .map(|e| e.full_sentence.as_str())
            .chain(sentence_rows.iter().flat_map(|r| {
                std::iter::once(r.exercise.full_sentence.as_str()).chain(r.answer.as_deref())
            }));
        let corpus = TokenCorpus::collect(texts, self.tokenizer, language);
        info!(tokens = corpus.len(), "Collected token corpus");

        let table =
            WordDifficultyTable::build(&corpus, self.frequencies, language, self.options.quantiles)?;
        let scorer = SentenceScorer::new(
            &table,
            self.tokenizer,
            self.frequencies,
            language,
            self.options.score_basis,
        );

        // Word exercises.
        let word_scores: Vec<WordExerciseScores> = word_rows
            .par_iter()
            .map(|e| WordExerciseScores {
                score: scorer.word_average(&e.full_sentence).ok(),
                target_word_score: scorer.target_word_score(&e.full_sentence).ok(),
                word_level: single_token_level(&table, self.tokenizer, &e.full_sentence, language),
            })
            .collect();
        let word_bins = fit_bins(word_scores.iter().map(|s| s.score), self.options.quantiles)?;

        let mut labeled = Vec::with_capacity(word_rows.len() + sentence_rows.len());
        for (exercise, scores) in word_rows.iter().zip(word_scores) {
            if scores.score.is_none() {
                diagnostics.push(empty_average(exercise, &exercise.full_sentence));
            }
            let rank = scores.score.map(|s| word_bins.rank(s));
            labeled.push(label(exercise, ExerciseRoute::Word, DerivedScores::Word(scores), rank));
        }

        // Sentence exercises.
        let length_denominator = if sentence_rows.is_empty() {
            None
        } else {
            Some(self.length_denominator(&scorer, &labeled, &sentence_rows))
        };

        let mut sentence_bins = QuantileBins::fit(&[], self.options.quantiles)?;
        if let Some(denominator) = length_denominator {
            let sentence_scores: Vec<_> = sentence_rows
                .par_iter()
                .map(|r| scorer.score_exercise(&r.exercise.full_sentence, r.answer.as_deref(), denominator))
                .collect();
            sentence_bins = fit_bins(
                sentence_scores.iter().map(|s| s.sentence_score),
                self.options.quantiles,
            )?;

            for (row, scores) in sentence_rows.iter().zip(sentence_scores) {
                if scores.sentence_average.is_none() {
                    diagnostics.push(empty_average(row.exercise, &scores.right_answer));
                }
                let rank = scores.sentence_score.map(|s| sentence_bins.rank(s));
                labeled.push(label(row.exercise, ExerciseRoute::Sentence, DerivedScores::Sentence(scores), rank));
            }
        }

        diagnostics.sort_by_key(|d| d.line);
        if !diagnostics.is_empty() {
            warn!(count = diagnostics.len(), "Rows with classification diagnostics");
        }
        info!(
            labeled = labeled.len(),
            word_bins = word_bins.bin_count(),
            sentence_bins = sentence_bins.bin_count(),
            "Classified exercises"
        );

        Ok(Classification {
            table,
            exercises: labeled,
            diagnostics,
            word_bins: word_bins.bin_count(),
            sentence_bins: sentence_bins.bin_count(),
            length_denominator,
        })
    }

    fn length_denominator(
        &self,
        scorer: &SentenceScorer<'_>,
        word_labeled: &[LabeledExercise],
        sentence_rows: &[SentenceRow<'_>],
    ) -> f64 {
        let longest_sentence = || {
            sentence_rows
                .iter()
                .map(|r| scorer.sentence_length(&r.exercise.full_sentence))
                .max()
                .unwrap_or(0) as f64
        };
        let raw = match self.options.length_normalization {
            LengthNormalization::SentenceLengths => longest_sentence(),
            LengthNormalization::WordExerciseScores => word_labeled
                .iter()
                .filter_map(LabeledExercise::binned_score)
                .max_by(f64::total_cmp)
                .unwrap_or_else(longest_sentence),
        };
        let denominator = sanitize_denominator(raw);
        debug!(raw, denominator, "Sentence length denominator");
        denominator
    }
}

/// Classify with the given collaborators and options.
pub fn classify(
    exercises: &[Exercise],
    tokenizer: &dyn Tokenizer,
    frequencies: &dyn FrequencyProvider,
    options: &ScoringOptions,
) -> Result<Classification, ScoringError> {
    ExerciseClassifier::new(tokenizer, frequencies, options).classify(exercises)
}

/// Propositions plus index win; otherwise the precomputed answer text, if any.
fn resolve_answer(exercise: &Exercise) -> Result<Option<String>, ScoringError> {
    match (&exercise.propositions, exercise.right_answer_id) {
        (Some(propositions), Some(index)) => right_answer(propositions, index).map(Some),
        _ => Ok(exercise.right_answer.clone()),
    }
}

fn single_token_level(
    table: &WordDifficultyTable,
    tokenizer: &dyn Tokenizer,
    text: &str,
    language: &str,
) -> Option<DifficultyLevel> {
    match tokenizer.tokenize(text, language).as_slice() {
        [token] => table.get(token).map(|w| w.level),
        _ => None,
    }
}

fn fit_bins(
    scores: impl Iterator<Item = Option<f64>>,
    quantiles: usize,
) -> Result<QuantileBins, ScoringError> {
    let values: Vec<f64> = scores.flatten().collect();
    QuantileBins::fit(&values, quantiles)
}

fn label(
    exercise: &Exercise,
    route: ExerciseRoute,
    scores: DerivedScores,
    rank: Option<usize>,
) -> LabeledExercise {
    LabeledExercise {
        exercise: exercise.clone(),
        route,
        scores,
        quantile_rank: rank,
        level: rank.map(level_for),
    }
}

fn diagnostic(exercise: &Exercise, kind: DiagnosticKind, message: String) -> RowDiagnostic {
    RowDiagnostic {
        line: exercise.line,
        id: exercise.id.clone(),
        kind,
        message,
    }
}

fn empty_average(exercise: &Exercise, text: &str) -> RowDiagnostic {
    let err = ScoringError::EmptyAverage {
        text: text.to_string(),
    };
    diagnostic(exercise, DiagnosticKind::EmptyAverage, err.to_string())
}
