//! Raw per-token difficulty.
//!
//! ```text
//! relative_length = length / longest_token_in_corpus
//! relative_rarity = 8 - zipf_frequency
//! raw_score       = relative_length * relative_rarity
//! ```

use crate::error::ScoringError;
use crate::lexicon::{FrequencyProvider, MAX_ZIPF};
use crate::scoring::corpus::TokenCorpus;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordScore {
    pub length: usize,
    pub frequency: f64,
    pub raw_score: f64,
}

/// Scores tokens against a fixed corpus denominator.
pub struct WordScorer<'a> {
    frequencies: &'a dyn FrequencyProvider,
    language: &'a str,
    longest: usize,
}

impl<'a> WordScorer<'a> {
    pub fn new(
        corpus: &TokenCorpus,
        frequencies: &'a dyn FrequencyProvider,
        language: &'a str,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            frequencies,
            language,
            longest: corpus.longest_token_length()?,
        })
    }

    pub fn longest(&self) -> usize {
        self.longest
    }

    pub fn score(&self, token: &str) -> Result<WordScore, ScoringError> {
        let length = token.chars().count();
        if length == 0 {
            return Err(ScoringError::EmptyToken);
        }
        let frequency = self.frequencies.frequency(token, self.language).clamp(0.0, MAX_ZIPF);
        let relative_length = length as f64 / self.longest as f64;
        let relative_rarity = MAX_ZIPF - frequency;
        Ok(WordScore {
            length,
            frequency,
            raw_score: relative_length * relative_rarity,
        })
    }
}

/// Score a single token against `corpus`.
pub fn score_word(
    token: &str,
    corpus: &TokenCorpus,
    frequencies: &dyn FrequencyProvider,
    language: &str,
) -> Result<WordScore, ScoringError> {
    WordScorer::new(corpus, frequencies, language)?.score(token)
}
