//! CSV ingest for exercise datasets.
//!
//! Turns a spreadsheet export into a clean list of `Exercise` rows.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No scoring here**: rows are only parsed, never routed or scored

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::Exercise;
use crate::error::AppError;

const OBJECTIVE_COLUMNS: [&str; 2] = ["exo_objective", "objective"];
const SENTENCE_COLUMNS: [&str; 1] = ["full_sentence"];
const ID_COLUMNS: [&str; 2] = ["id", "exo_id"];
const PROPOSITIONS_COLUMNS: [&str; 1] = ["propositions"];
const ANSWER_ID_COLUMNS: [&str; 1] = ["right_answer_id"];
const ANSWER_COLUMNS: [&str; 1] = ["right_answer"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct IngestedExercises {
    pub exercises: Vec<Exercise>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

pub fn load_exercises(path: &Path) -> Result<IngestedExercises, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_exercises(file)
}

pub fn read_exercises<R: Read>(input: R) -> Result<IngestedExercises, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = Columns::resolve(&build_header_map(&headers))?;

    let mut exercises = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &columns, line) {
            Ok(exercise) => exercises.push(exercise),
            Err(message) => row_errors.push(RowError {
                line,
                id: columns.get(&record, columns.id).map(str::to_string),
                message,
            }),
        }
    }

    if !row_errors.is_empty() {
        warn!(rows = row_errors.len(), "Skipped exercise rows during ingest");
    }

    let rows_used = exercises.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No usable exercise rows in the input."));
    }
    debug!(rows_read, rows_used, "Loaded exercises");

    Ok(IngestedExercises {
        exercises,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Column indices after alias resolution.
struct Columns {
    objective: usize,
    full_sentence: usize,
    id: Option<usize>,
    propositions: Option<usize>,
    right_answer_id: Option<usize>,
    right_answer: Option<usize>,
}

impl Columns {
    fn resolve(header_map: &HashMap<String, usize>) -> Result<Self, AppError> {
        let required = |names: &[&str]| {
            find_column(header_map, names).ok_or_else(|| {
                AppError::new(2, format!("Missing required column: `{}`", names[0]))
            })
        };
        Ok(Self {
            objective: required(&OBJECTIVE_COLUMNS[..])?,
            full_sentence: required(&SENTENCE_COLUMNS[..])?,
            id: find_column(header_map, &ID_COLUMNS),
            propositions: find_column(header_map, &PROPOSITIONS_COLUMNS),
            right_answer_id: find_column(header_map, &ANSWER_ID_COLUMNS),
            right_answer: find_column(header_map, &ANSWER_COLUMNS),
        })
    }

    fn get<'a>(&self, record: &'a StringRecord, idx: Option<usize>) -> Option<&'a str> {
        record.get(idx?).map(str::trim).filter(|s| !s.is_empty())
    }
}

fn parse_row(record: &StringRecord, columns: &Columns, line: usize) -> Result<Exercise, String> {
    let objective = columns
        .get(record, Some(columns.objective))
        .ok_or("Missing required value: `exo_objective`")?;
    let full_sentence = columns
        .get(record, Some(columns.full_sentence))
        .ok_or("Missing required value: `full_sentence`")?;

    let right_answer_id = match columns.get(record, columns.right_answer_id) {
        Some(raw) => Some(parse_answer_index(raw)?),
        None => None,
    };

    Ok(Exercise {
        line,
        id: columns.get(record, columns.id).map(str::to_string),
        objective: objective.to_string(),
        full_sentence: full_sentence.to_string(),
        propositions: columns.get(record, columns.propositions).map(str::to_string),
        right_answer_id,
        right_answer: columns.get(record, columns.right_answer).map(str::to_string),
    })
}

/// Accepts `1` as well as `1.0`, which spreadsheet exports write for integer cells.
fn parse_answer_index(raw: &str) -> Result<usize, String> {
    if let Ok(v) = raw.parse::<usize>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(v as usize),
        _ => Err(format!(
            "Invalid right_answer_id '{raw}'. Expected a non-negative integer."
        )),
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet tools sometimes emit UTF-8 CSVs with a BOM on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| header_map.get(*n).copied())
}
