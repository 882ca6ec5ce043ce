//! Unique-token corpus for one run.
//!
//! The corpus is collected once, before any scoring, and is read-only
//! afterwards. Its longest token is the shared denominator for every
//! relative-length computation in the batch.

use std::collections::BTreeSet;

use crate::error::ScoringError;
use crate::lexicon::{Tokenizer, canonical_token};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenCorpus {
    tokens: BTreeSet<String>,
    longest: usize,
}

impl TokenCorpus {
    /// Tokenize every text and keep the unique canonical tokens.
    pub fn collect<'a, I>(texts: I, tokenizer: &dyn Tokenizer, language: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::from_tokens(texts.into_iter().flat_map(|text| tokenizer.tokenize(text, language)))
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Self::default();
        for token in tokens {
            corpus.insert(token.as_ref());
        }
        corpus
    }

    fn insert(&mut self, token: &str) {
        let token = canonical_token(token);
        if token.is_empty() {
            return;
        }
        self.longest = self.longest.max(token.chars().count());
        self.tokens.insert(token);
    }

    /// Character count of the longest token.
    pub fn longest_token_length(&self) -> Result<usize, ScoringError> {
        if self.tokens.is_empty() {
            return Err(ScoringError::EmptyCorpus);
        }
        Ok(self.longest)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(&canonical_token(token))
    }

    /// Tokens in lexicographic order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
