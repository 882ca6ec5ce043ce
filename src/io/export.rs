//! Export labeled exercises and the word table to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Column names follow the exercise dataset's own conventions, so a
//! labeled export can be joined back onto the source sheet.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DerivedScores, LabeledExercise, WordDifficulty};
use crate::error::AppError;

const EXERCISE_HEADER: [&str; 18] = [
    "line",
    "id",
    "exo_objective",
    "full_sentence",
    "propositions",
    "right_answer_id",
    "route",
    "right_answer",
    "length_sentence",
    "length_target_word",
    "length_longest_word",
    "score_target_word",
    "score_rarest_word",
    "score_sentence",
    "score_sentence_average",
    "word_level",
    "quantile_rank",
    "difficulty",
];

const WORD_HEADER: [&str; 7] = [
    "word",
    "length",
    "zipf_freq",
    "score",
    "boxcox_score",
    "quantile_rank",
    "difficulty",
];

/// Write labeled exercises to a CSV file.
pub fn write_results_csv(path: &Path, exercises: &[LabeledExercise]) -> Result<(), AppError> {
    let file = create(path)?;
    write_exercises(file, exercises)
}

/// Write the word difficulty table to a CSV file.
pub fn write_words_csv(path: &Path, words: &[WordDifficulty]) -> Result<(), AppError> {
    let file = create(path)?;
    write_words(file, words)
}

pub fn write_exercises<W: Write>(out: W, exercises: &[LabeledExercise]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(EXERCISE_HEADER).map_err(write_err)?;

    for e in exercises {
        let x = &e.exercise;
        let mut row = vec![
            x.line.to_string(),
            x.id.clone().unwrap_or_default(),
            x.objective.clone(),
            x.full_sentence.clone(),
            x.propositions.clone().unwrap_or_default(),
            x.right_answer_id.map(|i| i.to_string()).unwrap_or_default(),
            format!("{:?}", e.route).to_lowercase(),
        ];

        match &e.scores {
            DerivedScores::Word(w) => row.extend([
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                fmt_opt(w.target_word_score),
                String::new(),
                fmt_opt(w.score),
                String::new(),
                w.word_level.map(|l| l.to_string()).unwrap_or_default(),
            ]),
            DerivedScores::Sentence(s) => row.extend([
                s.right_answer.clone(),
                s.sentence_length.to_string(),
                s.target_word_length.to_string(),
                s.longest_word_length.to_string(),
                fmt_opt(s.target_word_score),
                fmt_f64(s.rarest_word_score),
                fmt_opt(s.sentence_score),
                fmt_opt(s.sentence_average),
                String::new(),
            ]),
        }

        row.push(e.quantile_rank.map(|r| r.to_string()).unwrap_or_default());
        row.push(e.level.map(|l| l.to_string()).unwrap_or_default());
        writer.write_record(&row).map_err(write_err)?;
    }

    writer.flush().map_err(|e| write_err(e.into()))
}

pub fn write_words<W: Write>(out: W, words: &[WordDifficulty]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(WORD_HEADER).map_err(write_err)?;

    for w in words {
        writer
            .write_record([
                w.token.clone(),
                w.length.to_string(),
                fmt_f64(w.frequency),
                fmt_f64(w.raw_score),
                fmt_opt(w.transformed_score),
                w.quantile_rank.to_string(),
                w.level.to_string(),
            ])
            .map_err(write_err)?;
    }

    writer.flush().map_err(|e| write_err(e.into()))
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })
}

fn write_err(e: csv::Error) -> AppError {
    AppError::new(2, format!("Failed to write export CSV: {e}"))
}

fn fmt_f64(v: f64) -> String {
    format!("{v:.10}")
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(fmt_f64).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DifficultyLevel, Exercise, ExerciseRoute, SentenceExerciseScores, WordExerciseScores,
    };

    fn read_back(bytes: Vec<u8>) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn exercise_rows_align_with_header() {
        let exercises = vec![
            LabeledExercise {
                exercise: Exercise {
                    line: 2,
                    objective: "Learning vocabulary".to_string(),
                    full_sentence: "cat".to_string(),
                    ..Default::default()
                },
                route: ExerciseRoute::Word,
                scores: DerivedScores::Word(WordExerciseScores {
                    score: Some(1.5),
                    target_word_score: Some(1.5),
                    word_level: Some(DifficultyLevel::A2),
                }),
                quantile_rank: Some(3),
                level: Some(DifficultyLevel::A2),
            },
            LabeledExercise {
                exercise: Exercise {
                    line: 3,
                    objective: "Grammar".to_string(),
                    full_sentence: "The dog, sadly, sat".to_string(),
                    propositions: Some("cat-dog".to_string()),
                    right_answer_id: Some(1),
                    ..Default::default()
                },
                route: ExerciseRoute::Sentence,
                scores: DerivedScores::Sentence(SentenceExerciseScores {
                    right_answer: "dog".to_string(),
                    sentence_length: 4,
                    ..Default::default()
                }),
                quantile_rank: None,
                level: None,
            },
        ];

        let mut buf = Vec::new();
        write_exercises(&mut buf, &exercises).unwrap();
        let rows = read_back(buf);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == EXERCISE_HEADER.len()));
        assert_eq!(rows[0][6], "word");
        assert_eq!(rows[0][11], "1.5000000000");
        assert_eq!(rows[0][13], "1.5000000000");
        assert_eq!(rows[0][15], "A2");
        assert_eq!(rows[0][17], "A2");
        // Commas inside the sentence survive quoting.
        assert_eq!(rows[1][3], "The dog, sadly, sat");
        assert_eq!(rows[1][7], "dog");
        assert_eq!(rows[1][17], "");
    }

    #[test]
    fn word_rows_carry_level() {
        let words = vec![WordDifficulty {
            token: "the".to_string(),
            length: 3,
            frequency: 8.0,
            raw_score: 0.0,
            transformed_score: None,
            quantile_rank: 0,
            level: DifficultyLevel::A1,
        }];
        let mut buf = Vec::new();
        write_words(&mut buf, &words).unwrap();
        let rows = read_back(buf);
        assert_eq!(rows, vec![vec!["the", "3", "8.0000000000", "0.0000000000", "", "0", "A1"]]);
    }
}
