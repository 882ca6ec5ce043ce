//! Quantile rank → CEFR-style label.
//!
//! | rank      | level |
//! |-----------|-------|
//! | [0, 2)    | A1    |
//! | [2, 4)    | A2    |
//! | [4, 8)    | B1    |
//! | [8, 16)   | B2    |
//! | [16, ∞)   | C1    |
//!
//! Bands double in width, so the labels are coarse at the hard end.

use crate::domain::DifficultyLevel;

/// Exclusive upper rank bound of each level below C1.
const LEVEL_BOUNDS: [(usize, DifficultyLevel); 4] = [
    (2, DifficultyLevel::A1),
    (4, DifficultyLevel::A2),
    (8, DifficultyLevel::B1),
    (16, DifficultyLevel::B2),
];

pub fn level_for(rank: usize) -> DifficultyLevel {
    LEVEL_BOUNDS
        .iter()
        .find(|(bound, _)| rank < *bound)
        .map(|(_, level)| *level)
        .unwrap_or(DifficultyLevel::C1)
}
