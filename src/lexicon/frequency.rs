//! Zipf frequency table loaded from CSV.
//!
//! Expected schema (header names are case-insensitive):
//!
//! - token column: `word` or `token`
//! - frequency column: `zipf`, `frequency` or `freq`
//!
//! Values are clamped to `[0, 8]`. Rows with an empty token or an unparsable
//! frequency are skipped (and counted) rather than failing the load.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::AppError;
use crate::lexicon::{FrequencyProvider, MAX_ZIPF, canonical_token};

/// Frequency returned for tokens not present in the table.
pub const UNKNOWN_FREQUENCY: f64 = 0.0;

const TOKEN_COLUMNS: [&str; 2] = ["word", "token"];
const FREQUENCY_COLUMNS: [&str; 3] = ["zipf", "frequency", "freq"];

#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: HashMap<String, f64>,
}

impl FrequencyTable {
    /// Build a table from `(token, frequency)` pairs. Later duplicates win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(token, freq)| (canonical_token(token.as_ref()), clamp_zipf(freq)))
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(
                2,
                format!("Failed to open frequency table '{}': {e}", path.display()),
            )
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::new(2, format!("Failed to read frequency table headers: {e}")))?
            .clone();

        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim_start_matches('\u{feff}').to_ascii_lowercase();
                names.contains(&h.as_str())
            })
        };
        let token_idx = find(&TOKEN_COLUMNS[..])
            .ok_or_else(|| AppError::new(2, "Frequency table needs a `word` (or `token`) column."))?;
        let freq_idx = find(&FREQUENCY_COLUMNS[..]).ok_or_else(|| {
            AppError::new(2, "Frequency table needs a `zipf` (or `frequency`/`freq`) column.")
        })?;

        let mut entries = HashMap::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let Ok(record) = record else {
                skipped += 1;
                continue;
            };
            let token = record.get(token_idx).unwrap_or("");
            let freq = record.get(freq_idx).and_then(|s| s.parse::<f64>().ok());
            match freq {
                Some(f) if !token.is_empty() && f.is_finite() => {
                    entries.insert(canonical_token(token), clamp_zipf(f));
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "Skipped unusable frequency table rows");
        }
        debug!(entries = entries.len(), "Loaded frequency table");

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FrequencyProvider for FrequencyTable {
    fn frequency(&self, token: &str, _language: &str) -> f64 {
        self.entries
            .get(&canonical_token(token))
            .copied()
            .unwrap_or(UNKNOWN_FREQUENCY)
    }
}

fn clamp_zipf(value: f64) -> f64 {
    value.clamp(0.0, MAX_ZIPF)
}
