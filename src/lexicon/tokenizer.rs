//! Regex-based word tokenizer.

use regex::Regex;

use crate::error::AppError;
use crate::lexicon::Tokenizer;

/// Word characters plus straight and curly apostrophes, so "don't" and
/// "l’eau" stay single tokens.
const WORD_PATTERN: &str = r"[\w'‘’]+";

/// Lowercases text and extracts runs of word characters.
///
/// Punctuation and whitespace are dropped. The language code is accepted for
/// interface compatibility but does not change the behavior.
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    pub fn new() -> Result<Self, AppError> {
        let pattern = Regex::new(WORD_PATTERN)
            .map_err(|e| AppError::new(4, format!("Invalid tokenizer pattern: {e}")))?;
        Ok(Self { pattern })
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str, _language: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().trim_matches(|c| matches!(c, '\'' | '‘' | '’')))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_punctuation_and_lowercases() {
        let tok = RegexTokenizer::new().unwrap();
        assert_eq!(tok.tokenize("The cat sat.", "en"), vec!["the", "cat", "sat"]);
    }

    #[test]
    fn keeps_inner_apostrophes() {
        let tok = RegexTokenizer::new().unwrap();
        assert_eq!(tok.tokenize("Don't stop, l’eau!", "fr"), vec!["don't", "stop", "l’eau"]);
    }

    #[test]
    fn strips_quote_marks_around_words() {
        let tok = RegexTokenizer::new().unwrap();
        assert_eq!(tok.tokenize("'hello' ''", "en"), vec!["hello"]);
    }

    #[test]
    fn punctuation_only_text_has_no_tokens() {
        let tok = RegexTokenizer::new().unwrap();
        assert!(tok.tokenize("?!...", "en").is_empty());
    }
}
