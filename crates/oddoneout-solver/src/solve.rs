use oddoneout_taxonomy::{Label, Taxonomy};
use serde::{Deserialize, Serialize};

use crate::progress::{ProgressEvent, ProgressLogger};
use crate::{Puzzle, PuzzleDataset, TaxonomySimilarity};

/// The solver's answer for one puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub score: f64,
    /// Lowest common ancestor of the remaining four.
    pub category: Label,
    pub predicted_odd: Label,
}

impl Solution {
    pub fn into_tuple(self) -> (f64, Label, Label) {
        (self.score, self.category, self.predicted_odd)
    }
}

/// Score the group left after removing candidate `i`, with that candidate as
/// the odd one out.
fn score_exclusion<T: Taxonomy>(
    puzzle: &Puzzle,
    similarity: &mut TaxonomySimilarity<T>,
    i: usize,
    candidate: &Label,
) -> Solution {
    let group = puzzle.group_without(i);
    let score = similarity.score(&group, candidate);
    tracing::debug!(
        candidate = %candidate,
        score = score.value,
        category = %score.ancestor.category,
        "scored exclusion"
    );
    Solution {
        score: score.value,
        category: score.ancestor.category,
        predicted_odd: candidate.clone(),
    }
}

/// Try each of the five labels as the odd one out and keep the exclusion that
/// leaves the tightest group. Ties go to the earlier candidate.
pub fn solve_puzzle<T: Taxonomy>(puzzle: &Puzzle, similarity: &mut TaxonomySimilarity<T>) -> Solution {
    let mut best = score_exclusion(puzzle, similarity, 0, &puzzle.members[0]);
    for (i, candidate) in puzzle.candidates().enumerate().skip(1) {
        let solution = score_exclusion(puzzle, similarity, i, candidate);
        if solution.score > best.score {
            best = solution;
        }
    }
    best
}

/// Aggregate outcome of [`solve_puzzles`].
///
/// `num_total` is the dataset length; the two counts are tallied
/// independently and [`Self::is_consistent`] reports whether they add up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub num_correct: usize,
    pub num_incorrect: usize,
    pub num_total: usize,
}

impl EvaluationReport {
    pub fn is_consistent(&self) -> bool {
        self.num_correct + self.num_incorrect == self.num_total
    }

    pub fn accuracy(&self) -> f64 {
        if self.num_total == 0 {
            return 0.0;
        }
        self.num_correct as f64 / self.num_total as f64
    }

    pub fn into_tuple(self) -> (usize, usize, usize) {
        (self.num_correct, self.num_incorrect, self.num_total)
    }
}

pub fn solve_puzzles<T, L>(
    dataset: &PuzzleDataset,
    similarity: &mut TaxonomySimilarity<T>,
    logger: &mut L,
) -> EvaluationReport
where
    T: Taxonomy,
    L: ProgressLogger + ?Sized,
{
    let mut report = EvaluationReport {
        num_total: dataset.len(),
        ..EvaluationReport::default()
    };

    for (index, puzzle) in dataset.iter().enumerate() {
        let solution = solve_puzzle(puzzle, similarity);
        let correct = solution.predicted_odd == puzzle.true_odd;
        if correct {
            report.num_correct += 1;
        } else {
            report.num_incorrect += 1;
        }
        logger.puzzle_solved(&ProgressEvent {
            index,
            total: report.num_total,
            puzzle,
            solution: &solution,
            correct,
        });
    }

    if !report.is_consistent() {
        tracing::warn!(
            correct = report.num_correct,
            incorrect = report.num_incorrect,
            total = report.num_total,
            "evaluation counts do not add up to the dataset size"
        );
    }
    logger.finished(&report);
    report
}
