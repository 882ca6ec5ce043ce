//! Formatted terminal output.
//!
//! Formatting lives in one place so the scoring code stays clean and output
//! changes are localized.

use crate::domain::{
    ClassifyConfig, DerivedScores, DifficultyLevel, ExerciseRoute, LabeledExercise, RowDiagnostic,
    WordDifficulty,
};
use crate::io::ingest::{IngestedExercises, RowError};
use crate::report::{LevelDistribution, summarize_levels};
use crate::scoring::Classification;

/// Cap on listed problem rows; the remainder is summarized as a count.
const MAX_LISTED_PROBLEMS: usize = 20;

/// Format the run summary (inputs, routing, transform diagnostics, options).
pub fn format_run_summary(
    ingest: &IngestedExercises,
    classification: &Classification,
    config: &ClassifyConfig,
    frequency_entries: usize,
) -> String {
    let mut out = String::new();
    let table = &classification.table;

    out.push_str("=== exodiff - Exercise Difficulty ===\n");
    out.push_str(&format!("Input: {}\n", config.input_path.display()));
    out.push_str(&format!(
        "Frequencies: {} ({frequency_entries} entries) | language={}\n",
        config.frequency_path.display(),
        config.language
    ));
    out.push_str(&format!(
        "Rows: read={} | used={} | ingest errors={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    out.push_str(&format!(
        "Routed: word={} | sentence={} | excluded={}\n",
        classification.word_exercises().count(),
        classification.sentence_exercises().count(),
        classification.diagnostics.iter().filter(|d| d.kind.excludes_row()).count(),
    ));

    out.push_str("\nWord table:\n");
    out.push_str(&format!(
        "- tokens: {} (excluded from transform: {})\n",
        table.len(),
        table.excluded()
    ));
    out.push_str(&format!("- lambda: {}\n", fmt_opt(table.lambda(), 4)));
    out.push_str(&format!("- bins  : {} of {}\n", table.bin_count(), config.quantiles));

    out.push_str("\nExercise binning:\n");
    out.push_str(&format!("- word bins    : {}\n", classification.word_bins));
    out.push_str(&format!("- sentence bins: {}\n", classification.sentence_bins));
    out.push_str(&format!(
        "- length denominator: {} ({:?})\n",
        fmt_opt(classification.length_denominator, 3),
        config.length_normalization
    ));
    out.push_str(&format!("- score basis: {:?}\n", config.score_basis));
    out.push('\n');

    out
}

/// Format the per-level counts for tokens, word exercises and sentence exercises.
pub fn format_level_distribution(classification: &Classification) -> String {
    let summary = summarize_levels(classification);
    let mut out = String::new();

    out.push_str("Level distribution:\n");
    out.push_str(&format!("{:<10} {:>8} {:>10} {:>10}\n", "level", "tokens", "word_exo", "sent_exo"));
    out.push_str(&format!("{:-<10} {:-<8} {:-<10} {:-<10}\n", "", "", "", ""));

    let row = |label: &str, pick: &dyn Fn(&LevelDistribution) -> usize| {
        format!(
            "{:<10} {:>8} {:>10} {:>10}\n",
            label,
            pick(&summary.words),
            pick(&summary.word_exercises),
            pick(&summary.sentence_exercises),
        )
    };
    for level in DifficultyLevel::ALL {
        out.push_str(&row(level.as_str(), &|d: &LevelDistribution| d.count(level)));
    }
    out.push_str(&row("unlabeled", &|d: &LevelDistribution| d.unlabeled));

    out
}

/// Format the word ranking table.
pub fn format_word_ranking(words: &[WordDifficulty]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<20} {:>6} {:>6} {:>10} {:>10} {:>5} {:<5}\n",
            "word", "len", "zipf", "score", "boxcox", "rank", "level"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<20} {:-<6} {:-<6} {:-<10} {:-<10} {:-<5} {:-<5}\n", "", "", "", "", "", "", "").trim_end());
    out.push('\n');

    for w in words {
        out.push_str(
            format!(
                "{:<20} {:>6} {:>6.2} {:>10.4} {:>10} {:>5} {:<5}\n",
                truncate(&w.token, 20),
                w.length,
                w.frequency,
                w.raw_score,
                fmt_opt(w.transformed_score, 4),
                w.quantile_rank,
                w.level,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the hardest exercises of one route.
pub fn format_exercise_ranking(rows: &[LabeledExercise], route: ExerciseRoute) -> String {
    let mut out = String::new();
    let title = match route {
        ExerciseRoute::Word => "Hardest word exercises:",
        ExerciseRoute::Sentence => "Hardest sentence exercises:",
    };
    out.push_str(title);
    out.push('\n');
    out.push_str(format!("{:>6} {:<12} {:<36} {:<16} {:>10} {:<5}\n", "line", "id", "text", "answer", "score", "level").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<6} {:-<12} {:-<36} {:-<16} {:-<10} {:-<5}\n", "", "", "", "", "", "").trim_end());
    out.push('\n');

    for e in rows {
        let answer = match &e.scores {
            DerivedScores::Sentence(s) => s.right_answer.as_str(),
            DerivedScores::Word(_) => "",
        };
        out.push_str(
            format!(
                "{:>6} {:<12} {:<36} {:<16} {:>10} {:<5}\n",
                e.exercise.line,
                truncate(e.exercise.id.as_deref().unwrap_or(""), 12),
                truncate(&e.exercise.full_sentence, 36),
                truncate(answer, 16),
                fmt_opt(e.binned_score(), 4),
                e.level.map(|l| l.to_string()).unwrap_or_default(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format ingest errors and classification diagnostics. Empty when there are none.
pub fn format_problems(row_errors: &[RowError], diagnostics: &[RowDiagnostic]) -> String {
    let mut lines: Vec<(usize, String)> = row_errors
        .iter()
        .map(|e| (e.line, format!("{} [ingest] {}", fmt_row_ref(e.line, e.id.as_deref()), e.message)))
        .chain(diagnostics.iter().map(|d| {
            let text = format!("{} [{}] {}", fmt_row_ref(d.line, d.id.as_deref()), d.kind.as_str(), d.message);
            (d.line, text)
        }))
        .collect();
    if lines.is_empty() {
        return String::new();
    }
    lines.sort_by_key(|(line, _)| *line);

    let mut out = format!("Skipped/flagged rows ({}):\n", lines.len());
    for (_, text) in lines.iter().take(MAX_LISTED_PROBLEMS) {
        out.push_str("- ");
        out.push_str(text);
        out.push('\n');
    }
    if lines.len() > MAX_LISTED_PROBLEMS {
        out.push_str(&format!("  ... and {} more\n", lines.len() - MAX_LISTED_PROBLEMS));
    }
    out
}

fn fmt_row_ref(line: usize, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("line {line} ({id})"),
        None => format!("line {line}"),
    }
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
