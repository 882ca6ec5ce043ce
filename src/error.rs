use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures raised by the scoring core.
///
/// Corpus-level variants abort a run; the row-level ones (`LookupMiss`,
/// `EmptyAverage`, `MalformedPropositions`) are caught by the classifier and
/// turned into per-row diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("token corpus is empty; no length denominator can be computed")]
    EmptyCorpus,

    #[error("cannot score an empty token")]
    EmptyToken,

    #[error("power transform requires strictly positive scores, got {value}")]
    InvalidScoreDomain { value: f64 },

    #[error("score distribution contains a non-finite value")]
    NonFiniteScore,

    #[error("no word difficulty entry for '{token}'")]
    LookupMiss { token: String },

    #[error("no token of '{text}' has a word difficulty entry")]
    EmptyAverage { text: String },

    #[error("propositions '{propositions}' have {available} entries; answer index {index} is out of range")]
    MalformedPropositions {
        propositions: String,
        index: usize,
        available: usize,
    },
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        let code = match err {
            ScoringError::EmptyCorpus => 3,
            _ => 4,
        };
        AppError::new(code, err.to_string())
    }
}
