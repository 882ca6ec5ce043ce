//! Sentence-level aggregation of word scores.
//!
//! ```text
//! sentence_score = (sentence_length / length_denominator)
//!                * word_average(answer)
//!                * rarest_word_penalty(answer)
//! ```
//!
//! `sentence_length` counts every token of the full sentence (duplicates
//! included). The average and the penalty work on the **unique** tokens of
//! the correct answer; for free-text rows the answer is the sentence itself.

use std::collections::BTreeSet;

use crate::domain::{ScoreBasis, SentenceExerciseScores};
use crate::error::ScoringError;
use crate::lexicon::{FrequencyProvider, MAX_ZIPF, Tokenizer};
use crate::scoring::table::WordDifficultyTable;

/// Separator between answer alternatives in a propositions field.
pub const PROPOSITION_SEPARATOR: char = '-';

/// Pick the correct answer out of a hyphen-delimited propositions field.
///
/// Pieces are trimmed; empty pieces still count as positions.
pub fn right_answer(propositions: &str, index: usize) -> Result<String, ScoringError> {
    let pieces: Vec<&str> = propositions.split(PROPOSITION_SEPARATOR).collect();
    pieces
        .get(index)
        .map(|p| p.trim().to_string())
        .ok_or_else(|| ScoringError::MalformedPropositions {
            propositions: propositions.to_string(),
            index,
            available: pieces.len(),
        })
}

/// Replace a zero or non-finite length denominator with 1.
pub fn sanitize_denominator(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

pub struct SentenceScorer<'a> {
    table: &'a WordDifficultyTable,
    tokenizer: &'a dyn Tokenizer,
    frequencies: &'a dyn FrequencyProvider,
    language: &'a str,
    basis: ScoreBasis,
}

impl<'a> SentenceScorer<'a> {
    pub fn new(
        table: &'a WordDifficultyTable,
        tokenizer: &'a dyn Tokenizer,
        frequencies: &'a dyn FrequencyProvider,
        language: &'a str,
        basis: ScoreBasis,
    ) -> Self {
        Self {
            table,
            tokenizer,
            frequencies,
            language,
            basis,
        }
    }

    fn unique_tokens(&self, text: &str) -> BTreeSet<String> {
        self.tokenizer.tokenize(text, self.language).into_iter().collect()
    }

    /// Token count, duplicates included.
    pub fn sentence_length(&self, text: &str) -> usize {
        self.tokenizer.tokenize(text, self.language).len()
    }

    /// Character count of the longest token (0 for text without tokens).
    pub fn longest_word_length(&self, text: &str) -> usize {
        self.unique_tokens(text)
            .iter()
            .map(|t| t.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Mean word score over the unique tokens of `text` found in the table.
    ///
    /// Unknown tokens are skipped. With the transformed basis, tokens that
    /// were left out of the power transform are skipped too, and the rest
    /// are shifted positive so the mean never flips the sentence product.
    pub fn word_average(&self, text: &str) -> Result<f64, ScoringError> {
        let scores: Vec<f64> = self
            .unique_tokens(text)
            .iter()
            .filter_map(|t| self.table.get(t))
            .filter_map(|w| self.table.aggregate_score(w, self.basis))
            .collect();
        if scores.is_empty() {
            return Err(ScoringError::EmptyAverage {
                text: text.to_string(),
            });
        }
        Ok(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// `8 - min(frequency)` over the unique tokens of `text`; 8 when there are none.
    pub fn rarest_word_penalty(&self, text: &str) -> f64 {
        let rarest = self
            .unique_tokens(text)
            .iter()
            .map(|t| self.frequencies.frequency(t, self.language).clamp(0.0, MAX_ZIPF))
            .min_by(f64::total_cmp)
            .unwrap_or(0.0);
        MAX_ZIPF - rarest
    }

    /// Table score of `answer` when it is a single known token.
    pub fn target_word_score(&self, answer: &str) -> Result<f64, ScoringError> {
        let tokens = self.tokenizer.tokenize(answer, self.language);
        let miss = || ScoringError::LookupMiss {
            token: answer.to_string(),
        };
        match tokens.as_slice() {
            [token] => {
                let word = self.table.lookup(token)?;
                self.table.aggregate_score(word, self.basis).ok_or_else(miss)
            }
            _ => Err(miss()),
        }
    }

    /// Score free text on its own: length, average and penalty all come from `text`.
    pub fn score_sentence(&self, text: &str, length_denominator: f64) -> Result<f64, ScoringError> {
        let ratio = self.sentence_length(text) as f64 / sanitize_denominator(length_denominator);
        Ok(ratio * self.word_average(text)? * self.rarest_word_penalty(text))
    }

    /// All derived columns for a sentence exercise.
    ///
    /// `answer` drives the average and the penalty; `None` falls back to the
    /// full sentence. An empty average leaves `sentence_average` and
    /// `sentence_score` unset instead of failing.
    pub fn score_exercise(
        &self,
        full_sentence: &str,
        answer: Option<&str>,
        length_denominator: f64,
    ) -> SentenceExerciseScores {
        let answer = answer.unwrap_or(full_sentence);
        let sentence_length = self.sentence_length(full_sentence);
        let average = self.word_average(answer).ok();
        let rarest = self.rarest_word_penalty(answer);
        let ratio = sentence_length as f64 / sanitize_denominator(length_denominator);

        SentenceExerciseScores {
            right_answer: answer.to_string(),
            sentence_length,
            target_word_length: answer.chars().count(),
            longest_word_length: self.longest_word_length(full_sentence),
            target_word_score: self.target_word_score(answer).ok(),
            rarest_word_score: rarest,
            sentence_average: average,
            sentence_score: average.map(|avg| ratio * avg * rarest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{FrequencyTable, RegexTokenizer};
    use crate::scoring::corpus::TokenCorpus;

    struct Fixture {
        table: WordDifficultyTable,
        tokenizer: RegexTokenizer,
        freqs: FrequencyTable,
    }

    fn fixture(tokens: &[&str]) -> Fixture {
        let freqs = FrequencyTable::from_pairs([
            ("the", 7.5),
            ("cat", 5.0),
            ("sat", 4.0),
            ("dog", 5.2),
            ("bird", 4.6),
            ("on", 7.0),
            ("mat", 3.5),
        ]);
        let corpus = TokenCorpus::from_tokens(tokens.iter().copied());
        let table = WordDifficultyTable::build(&corpus, &freqs, "en", 32).unwrap();
        Fixture {
            table,
            tokenizer: RegexTokenizer::new().unwrap(),
            freqs,
        }
    }

    impl Fixture {
        fn scorer(&self) -> SentenceScorer<'_> {
            self.scorer_on(ScoreBasis::Raw)
        }

        fn scorer_on(&self, basis: ScoreBasis) -> SentenceScorer<'_> {
            SentenceScorer::new(&self.table, &self.tokenizer, &self.freqs, "en", basis)
        }
    }

    #[test]
    fn picks_answer_by_index() {
        assert_eq!(right_answer("cat-dog-bird", 1).unwrap(), "dog");
        assert_eq!(right_answer(" cat - dog ", 0).unwrap(), "cat");
    }

    #[test]
    fn out_of_range_index_is_malformed() {
        let err = right_answer("cat-dog", 2).unwrap_err();
        assert_eq!(
            err,
            ScoringError::MalformedPropositions {
                propositions: "cat-dog".to_string(),
                index: 2,
                available: 2,
            }
        );
    }

    #[test]
    fn average_skips_unknown_tokens() {
        let f = fixture(&["the", "sat"]);
        let scorer = f.scorer();
        let the = f.table.get("the").unwrap().raw_score;
        let sat = f.table.get("sat").unwrap().raw_score;

        // "cat" is not in the table and must not poison the mean.
        let avg = scorer.word_average("The cat sat.").unwrap();
        assert!((avg - (the + sat) / 2.0).abs() < 1e-12);
        assert!(avg.is_finite());
    }

    #[test]
    fn average_uses_unique_tokens() {
        let f = fixture(&["the", "cat"]);
        let scorer = f.scorer();
        let once = scorer.word_average("the cat").unwrap();
        let repeated = scorer.word_average("the the the cat").unwrap();
        assert!((once - repeated).abs() < 1e-12);
    }

    #[test]
    fn absent_answer_is_an_empty_average_not_a_panic() {
        let f = fixture(&["the", "sat"]);
        let scorer = f.scorer();
        assert!(matches!(
            scorer.word_average("cat"),
            Err(ScoringError::EmptyAverage { .. })
        ));

        let scores = scorer.score_exercise("The cat sat.", Some("cat"), 3.0);
        assert_eq!(scores.sentence_average, None);
        assert_eq!(scores.sentence_score, None);
        assert_eq!(scores.target_word_score, None);
        assert_eq!(scores.sentence_length, 3);
    }

    #[test]
    fn rarest_penalty_uses_lowest_frequency() {
        let f = fixture(&["the", "mat"]);
        let scorer = f.scorer();
        assert!((scorer.rarest_word_penalty("the mat") - (8.0 - 3.5)).abs() < 1e-12);
        assert!((scorer.rarest_word_penalty("...") - 8.0).abs() < 1e-12);
        // Unknown to the frequency table: maximally rare.
        assert!((scorer.rarest_word_penalty("zyzzyva the") - 8.0).abs() < 1e-12);
    }

    #[test]
    fn sentence_score_combines_the_three_factors() {
        let f = fixture(&["the", "cat", "sat", "on", "mat"]);
        let scorer = f.scorer();
        let text = "The cat sat on the mat.";
        let avg = scorer.word_average(text).unwrap();
        let penalty = scorer.rarest_word_penalty(text);
        let score = scorer.score_sentence(text, 12.0).unwrap();
        assert!((score - (6.0 / 12.0) * avg * penalty).abs() < 1e-12);
    }

    #[test]
    fn exercise_columns_follow_the_answer() {
        let f = fixture(&["the", "cat", "sat", "on", "mat", "dog", "bird"]);
        let scorer = f.scorer();
        let scores = scorer.score_exercise("The dog sat on the mat", Some("dog"), 6.0);

        let dog = f.table.get("dog").unwrap();
        assert_eq!(scores.right_answer, "dog");
        assert_eq!(scores.sentence_length, 6);
        assert_eq!(scores.target_word_length, 3);
        assert_eq!(scores.longest_word_length, 3);
        assert_eq!(scores.target_word_score, Some(dog.raw_score));
        assert!((scores.rarest_word_score - (8.0 - 5.2)).abs() < 1e-12);
        let expected = 1.0 * dog.raw_score * (8.0 - 5.2);
        assert!((scores.sentence_score.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn multi_token_answer_has_no_target_score() {
        let f = fixture(&["the", "cat"]);
        let scorer = f.scorer();
        assert!(matches!(
            scorer.target_word_score("the cat"),
            Err(ScoringError::LookupMiss { .. })
        ));
    }

    #[test]
    fn zero_denominator_is_replaced() {
        assert_eq!(sanitize_denominator(0.0), 1.0);
        assert_eq!(sanitize_denominator(f64::NAN), 1.0);
        assert_eq!(sanitize_denominator(4.5), 4.5);
    }

    #[test]
    fn longer_sentences_never_score_lower_on_either_basis() {
        let f = fixture(&["the", "cat", "sat", "on", "mat", "dog", "bird"]);
        let sentences = [
            "on",
            "the cat sat on",
            "the cat sat on the mat",
            "the dog and the cat sat on the mat by the bird",
        ];
        for basis in [ScoreBasis::Raw, ScoreBasis::Transformed] {
            let scorer = f.scorer_on(basis);
            let scores: Vec<f64> = sentences
                .iter()
                .map(|s| scorer.score_exercise(s, Some("on"), 12.0).sentence_score.unwrap())
                .collect();
            assert!(scores.iter().all(|&s| s > 0.0), "{basis:?}: {scores:?}");
            assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{basis:?}: {scores:?}");
        }
    }

    #[test]
    fn transformed_average_skips_excluded_tokens() {
        // zipf 8 gives "the" a zero raw score.
        let freqs = FrequencyTable::from_pairs([("the", 8.0), ("cat", 5.0), ("dog", 4.0)]);
        let corpus = TokenCorpus::from_tokens(["the", "cat", "dog"]);
        let table = WordDifficultyTable::build(&corpus, &freqs, "en", 32).unwrap();
        let tokenizer = RegexTokenizer::new().unwrap();
        let scorer = SentenceScorer::new(&table, &tokenizer, &freqs, "en", ScoreBasis::Transformed);

        assert_eq!(table.get("the").unwrap().transformed_score, None);
        let cat = table
            .aggregate_score(table.get("cat").unwrap(), ScoreBasis::Transformed)
            .unwrap();
        assert!((scorer.word_average("the cat").unwrap() - cat).abs() < 1e-12);
        assert!(matches!(
            scorer.word_average("the"),
            Err(ScoringError::EmptyAverage { .. })
        ));
    }
}
