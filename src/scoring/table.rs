//! Immutable token → difficulty table.
//!
//! Built once per run from the full corpus:
//!
//! 1. score every token (parallel; the corpus denominator is already fixed)
//! 2. sort by raw score ascending, ties by token, for a stable inspectable order
//! 3. Box–Cox the raw scores (zero scores are excluded from the fit)
//! 4. quantile-bin the transformed scores and map ranks to levels
//!
//! Excluded (zero-score) tokens are the most common words in the corpus, so
//! they take the lowest rank and level.
//!
//! Box–Cox values can be negative, which would flip the sign of any product
//! they feed. Aggregates therefore read transformed scores through
//! [`WordDifficultyTable::aggregate_score`], shifted so the table minimum
//! maps to [`TRANSFORMED_SHIFT`].

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{ScoreBasis, WordDifficulty};
use crate::error::ScoringError;
use crate::lexicon::{FrequencyProvider, canonical_token};
use crate::scoring::corpus::TokenCorpus;
use crate::scoring::level::level_for;
use crate::scoring::normalize::normalize_excluding_non_positive;
use crate::scoring::quantile::QuantileBins;
use crate::scoring::word::WordScorer;

/// Value the smallest transformed score is shifted to before aggregation.
pub const TRANSFORMED_SHIFT: f64 = 1e-6;

#[derive(Debug, Clone, Default)]
pub struct WordDifficultyTable {
    words: Vec<WordDifficulty>,
    index: HashMap<String, usize>,
    lambda: Option<f64>,
    bin_count: usize,
    excluded: usize,
    transformed_floor: Option<f64>,
}

impl WordDifficultyTable {
    pub fn build(
        corpus: &TokenCorpus,
        frequencies: &dyn FrequencyProvider,
        language: &str,
        quantiles: usize,
    ) -> Result<Self, ScoringError> {
        let scorer = WordScorer::new(corpus, frequencies, language)?;
        let tokens: Vec<&str> = corpus.tokens().collect();

        let mut scored = tokens
            .par_iter()
            .map(|&token| scorer.score(token).map(|s| (token, s)))
            .collect::<Result<Vec<_>, _>>()?;
        scored.sort_by(|a, b| {
            a.1.raw_score
                .total_cmp(&b.1.raw_score)
                .then_with(|| a.0.cmp(b.0))
        });
        debug!(tokens = scored.len(), longest = scorer.longest(), "Scored corpus tokens");

        let raw: Vec<f64> = scored.iter().map(|(_, s)| s.raw_score).collect();
        let transformed = normalize_excluding_non_positive(&raw)?;

        let fitted: Vec<f64> = transformed.values.iter().flatten().copied().collect();
        let bins = QuantileBins::fit(&fitted, quantiles)?;

        let words: Vec<WordDifficulty> = scored
            .into_iter()
            .zip(transformed.values.iter())
            .map(|((token, s), t)| {
                let quantile_rank = t.map(|v| bins.rank(v)).unwrap_or(0);
                WordDifficulty {
                    token: token.to_string(),
                    length: s.length,
                    frequency: s.frequency,
                    raw_score: s.raw_score,
                    transformed_score: *t,
                    quantile_rank,
                    level: level_for(quantile_rank),
                }
            })
            .collect();

        info!(
            words = words.len(),
            lambda = ?transformed.lambda,
            bins = bins.bin_count(),
            excluded = transformed.excluded,
            "Built word difficulty table"
        );

        Ok(Self::from_words(words, transformed.lambda, bins.bin_count(), transformed.excluded))
    }

    /// Assemble a table from precomputed records (order is kept as given).
    pub fn from_words(
        words: Vec<WordDifficulty>,
        lambda: Option<f64>,
        bin_count: usize,
        excluded: usize,
    ) -> Self {
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (canonical_token(&w.token), i))
            .collect();
        let transformed_floor = words
            .iter()
            .filter_map(|w| w.transformed_score)
            .min_by(f64::total_cmp);
        Self {
            words,
            index,
            lambda,
            bin_count,
            excluded,
            transformed_floor,
        }
    }

    /// Case-insensitive exact-token lookup.
    pub fn get(&self, token: &str) -> Option<&WordDifficulty> {
        self.index.get(&canonical_token(token)).map(|&i| &self.words[i])
    }

    pub fn lookup(&self, token: &str) -> Result<&WordDifficulty, ScoringError> {
        self.get(token).ok_or_else(|| ScoringError::LookupMiss {
            token: token.to_string(),
        })
    }

    /// Strictly positive score of `word` on `basis`, safe to average and multiply.
    ///
    /// Raw scores are returned as is. Transformed scores are shifted by the
    /// table minimum, which keeps their order. Words excluded from the
    /// transform have no transformed score.
    pub fn aggregate_score(&self, word: &WordDifficulty, basis: ScoreBasis) -> Option<f64> {
        match basis {
            ScoreBasis::Raw => Some(word.raw_score),
            ScoreBasis::Transformed => {
                let t = word.transformed_score?;
                Some(t - self.transformed_floor.unwrap_or(t) + TRANSFORMED_SHIFT)
            }
        }
    }

    /// Records ordered by raw score ascending.
    pub fn words(&self) -> &[WordDifficulty] {
        &self.words
    }

    pub fn lambda(&self) -> Option<f64> {
        self.lambda
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Tokens left out of the power transform (zero raw score).
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DifficultyLevel;
    use crate::lexicon::FrequencyTable;

    fn build(tokens: &[&str], freqs: &[(&str, f64)]) -> WordDifficultyTable {
        let corpus = TokenCorpus::from_tokens(tokens.iter().copied());
        let table = FrequencyTable::from_pairs(freqs.iter().copied());
        WordDifficultyTable::build(&corpus, &table, "en", 32).unwrap()
    }

    #[test]
    fn harder_words_never_rank_lower() {
        let table = build(
            &["a", "cat", "elephant"],
            &[("a", 7.0), ("cat", 5.0), ("elephant", 2.0)],
        );
        let a = table.get("a").unwrap();
        let elephant = table.get("Elephant").unwrap();
        assert!((a.raw_score - 0.125).abs() < 1e-12);
        assert!((elephant.raw_score - 6.0).abs() < 1e-12);
        assert!(elephant.level >= a.level);
        assert!(elephant.quantile_rank >= a.quantile_rank);
    }

    #[test]
    fn sorted_by_raw_score() {
        let table = build(
            &["zebra", "a", "cat", "elephant"],
            &[("a", 7.0), ("cat", 5.0), ("elephant", 2.0), ("zebra", 3.0)],
        );
        let scores: Vec<f64> = table.words().iter().map(|w| w.raw_score).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn monotone_levels_over_larger_corpus() {
        let tokens: Vec<String> = (1..=60).map(|i| "x".repeat(1 + i % 9) + &i.to_string()).collect();
        let freqs: Vec<(String, f64)> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), (i % 8) as f64 + 0.3))
            .collect();
        let corpus = TokenCorpus::from_tokens(tokens.iter());
        let provider = FrequencyTable::from_pairs(freqs.iter().map(|(t, f)| (t.as_str(), *f)));
        let table = WordDifficultyTable::build(&corpus, &provider, "en", 32).unwrap();

        let words = table.words();
        for pair in words.windows(2) {
            assert!(pair[0].level <= pair[1].level);
            assert!(pair[0].quantile_rank <= pair[1].quantile_rank);
        }
        assert_eq!(words.first().unwrap().level, DifficultyLevel::A1);
        assert_eq!(words.last().unwrap().level, DifficultyLevel::C1);
    }

    #[test]
    fn zero_scores_are_excluded_and_easiest() {
        let table = build(&["the", "cat", "dog"], &[("the", 8.0), ("cat", 5.0), ("dog", 4.0)]);
        assert_eq!(table.excluded(), 1);
        let the = table.get("the").unwrap();
        assert_eq!(the.transformed_score, None);
        assert_eq!(the.quantile_rank, 0);
        assert_eq!(the.level, DifficultyLevel::A1);
    }

    #[test]
    fn transformed_aggregate_scores_are_positive_and_ordered() {
        let table = build(
            &["the", "a", "cat", "sat", "elephant", "serendipity"],
            &[
                ("the", 8.0),
                ("a", 7.4),
                ("cat", 5.0),
                ("sat", 4.1),
                ("elephant", 3.2),
                ("serendipity", 2.1),
            ],
        );
        assert!(table.words().iter().any(|w| w.transformed_score.is_some_and(|t| t < 0.0)));

        let shifted: Vec<f64> = table
            .words()
            .iter()
            .filter_map(|w| table.aggregate_score(w, ScoreBasis::Transformed))
            .collect();
        assert_eq!(shifted.len(), table.len() - table.excluded());
        assert!(shifted.iter().all(|&s| s > 0.0));
        assert!(shifted.windows(2).all(|w| w[0] <= w[1]));
        assert!((shifted[0] - TRANSFORMED_SHIFT).abs() < 1e-12);

        let the = table.get("the").unwrap();
        assert_eq!(table.aggregate_score(the, ScoreBasis::Transformed), None);
        assert_eq!(table.aggregate_score(the, ScoreBasis::Raw), Some(0.0));
    }

    #[test]
    fn single_token_corpus_ranks_zero() {
        let table = build(&["solo"], &[("solo", 3.0)]);
        let solo = table.get("solo").unwrap();
        assert_eq!(solo.quantile_rank, 0);
        assert_eq!(solo.level, DifficultyLevel::A1);
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let tokens = ["walk", "walked", "ambulate", "stroll", "go"];
        let freqs = [("walk", 5.1), ("walked", 4.4), ("ambulate", 1.2), ("stroll", 3.0), ("go", 6.5)];
        assert_eq!(build(&tokens, &freqs).words(), build(&tokens, &freqs).words());
    }

    #[test]
    fn lookup_miss_is_typed() {
        let table = build(&["cat"], &[("cat", 5.0)]);
        assert_eq!(
            table.lookup("dog").unwrap_err(),
            ScoringError::LookupMiss { token: "dog".to_string() }
        );
    }

    #[test]
    fn empty_corpus_fails() {
        let err = WordDifficultyTable::build(
            &TokenCorpus::default(),
            &FrequencyTable::default(),
            "en",
            32,
        )
        .unwrap_err();
        assert_eq!(err, ScoringError::EmptyCorpus);
    }
}
