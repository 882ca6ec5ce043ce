//! Language primitives the scoring core depends on.
//!
//! The core only needs two operations: split text into tokens, and look up a
//! zipf-style frequency for a token. Both are traits so callers can plug in a
//! real NLP pipeline; the implementations here are the ones the CLI ships with.

pub mod frequency;
pub mod tokenizer;

pub use frequency::*;
pub use tokenizer::*;

/// Upper end of the zipf frequency scale.
pub const MAX_ZIPF: f64 = 8.0;

/// Splits text into an ordered sequence of tokens.
///
/// Implementations must be deterministic for a fixed `(text, language)`.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str, language: &str) -> Vec<String>;
}

/// Looks up how common a token is, on a 0 (rare) to 8 (very common) scale.
///
/// Unknown tokens must return a low, consistent default rather than failing.
pub trait FrequencyProvider: Send + Sync {
    fn frequency(&self, token: &str, language: &str) -> f64;
}

/// Canonical token identity: lowercased text.
pub fn canonical_token(token: &str) -> String {
    token.to_lowercase()
}
