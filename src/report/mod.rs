//! Reporting utilities: level distributions and difficulty rankings.

pub mod format;

pub use format::*;

use crate::domain::{DifficultyLevel, ExerciseRoute, LabeledExercise, WordDifficulty};
use crate::scoring::Classification;

/// Label counts for one population (tokens, word rows or sentence rows).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelDistribution {
    /// Indexed like `DifficultyLevel::ALL`.
    pub counts: [usize; 5],
    pub unlabeled: usize,
}

impl LevelDistribution {
    pub fn from_levels(levels: impl IntoIterator<Item = Option<DifficultyLevel>>) -> Self {
        let mut dist = Self::default();
        for level in levels {
            match level {
                Some(l) => dist.counts[l as usize] += 1,
                None => dist.unlabeled += 1,
            }
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.unlabeled
    }

    pub fn count(&self, level: DifficultyLevel) -> usize {
        self.counts[level as usize]
    }
}

/// Distributions for the three labeled populations of a run.
#[derive(Debug, Clone)]
pub struct LevelSummary {
    pub words: LevelDistribution,
    pub word_exercises: LevelDistribution,
    pub sentence_exercises: LevelDistribution,
}

pub fn summarize_levels(classification: &Classification) -> LevelSummary {
    let by_route = |route: ExerciseRoute| {
        LevelDistribution::from_levels(
            classification
                .exercises
                .iter()
                .filter(|e| e.route == route)
                .map(|e| e.level),
        )
    };
    LevelSummary {
        words: LevelDistribution::from_levels(classification.table.words().iter().map(|w| Some(w.level))),
        word_exercises: by_route(ExerciseRoute::Word),
        sentence_exercises: by_route(ExerciseRoute::Sentence),
    }
}

/// Top-N tokens by raw score, hardest first (ties by token).
pub fn hardest_words(words: &[WordDifficulty], top_n: usize) -> Vec<WordDifficulty> {
    let mut sorted = words.to_vec();
    sorted.sort_by(|a, b| {
        b.raw_score
            .total_cmp(&a.raw_score)
            .then_with(|| a.token.cmp(&b.token))
    });
    sorted.truncate(top_n);
    sorted
}

/// Top-N exercises of a route by binned score, hardest first. Unscored rows are skipped.
pub fn hardest_exercises(
    exercises: &[LabeledExercise],
    route: ExerciseRoute,
    top_n: usize,
) -> Vec<LabeledExercise> {
    let mut scored: Vec<(f64, &LabeledExercise)> = exercises
        .iter()
        .filter(|e| e.route == route)
        .filter_map(|e| e.binned_score().map(|s| (s, e)))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.exercise.line.cmp(&b.1.exercise.line)));
    scored.into_iter().take(top_n).map(|(_, e)| e.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(token: &str, raw: f64) -> WordDifficulty {
        WordDifficulty {
            token: token.to_string(),
            length: token.len(),
            frequency: 4.0,
            raw_score: raw,
            transformed_score: Some(raw),
            quantile_rank: 0,
            level: DifficultyLevel::A1,
        }
    }

    #[test]
    fn hardest_words_sorted_descending() {
        let words = vec![word("a", 0.1), word("zebra", 3.0), word("quark", 3.0), word("cat", 1.0)];
        let top = hardest_words(&words, 3);
        let tokens: Vec<&str> = top.iter().map(|w| w.token.as_str()).collect();
        assert_eq!(tokens, vec!["quark", "zebra", "cat"]);
    }

    #[test]
    fn distribution_counts_unlabeled() {
        let dist = LevelDistribution::from_levels([
            Some(DifficultyLevel::A1),
            Some(DifficultyLevel::C1),
            Some(DifficultyLevel::C1),
            None,
        ]);
        assert_eq!(dist.count(DifficultyLevel::A1), 1);
        assert_eq!(dist.count(DifficultyLevel::C1), 2);
        assert_eq!(dist.unlabeled, 1);
        assert_eq!(dist.total(), 4);
    }
}
