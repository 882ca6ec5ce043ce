//! Read/write word table JSON files.
//!
//! The snapshot is the portable form of a run's word table: every token with
//! its scores and level, plus the fitted Box–Cox parameter and the effective
//! bin count. The schema is defined by `domain::WordTableFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::WordTableFile;
use crate::error::AppError;
use crate::scoring::WordDifficultyTable;

pub const TOOL_NAME: &str = "exodiff";

pub fn snapshot(table: &WordDifficultyTable, language: &str) -> WordTableFile {
    WordTableFile {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        language: language.to_string(),
        lambda: table.lambda(),
        bins: table.bin_count(),
        words: table.words().to_vec(),
    }
}

/// Write a word table JSON file.
pub fn write_table_json(path: &Path, table: &WordDifficultyTable, language: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create table JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &snapshot(table, language))
        .map_err(|e| AppError::new(2, format!("Failed to write table JSON: {e}")))?;

    Ok(())
}

/// Read a word table JSON file.
pub fn read_table_json(path: &Path) -> Result<WordTableFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open table JSON '{}': {e}", path.display())))?;
    let table: WordTableFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid table JSON: {e}")))?;
    Ok(table)
}
