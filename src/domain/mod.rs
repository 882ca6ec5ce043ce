//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the ordinal label set (`DifficultyLevel`)
//! - input rows (`Exercise`) and their labeled counterparts (`LabeledExercise`)
//! - the per-token record (`WordDifficulty`)
//! - run configuration and policy enums (`ClassifyConfig`, `ScoreBasis`, `LengthNormalization`)

pub mod types;

pub use types::*;
