//! Progress reporting for batch evaluation.

use crate::{EvaluationReport, Puzzle, Solution};

/// One solved puzzle, as seen by a [`ProgressLogger`].
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent<'a> {
    /// Zero-based position in the dataset.
    pub index: usize,
    pub total: usize,
    pub puzzle: &'a Puzzle,
    pub solution: &'a Solution,
    pub correct: bool,
}

pub trait ProgressLogger {
    fn puzzle_solved(&mut self, event: &ProgressEvent<'_>);

    fn finished(&mut self, _report: &EvaluationReport) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentLogger;

impl ProgressLogger for SilentLogger {
    fn puzzle_solved(&mut self, _event: &ProgressEvent<'_>) {}
}

/// Emits one `info` event per puzzle and a summary at the end.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ProgressLogger for TracingLogger {
    fn puzzle_solved(&mut self, event: &ProgressEvent<'_>) {
        tracing::info!(
            puzzle = event.index + 1,
            total = event.total,
            predicted = %event.solution.predicted_odd,
            expected = %event.puzzle.true_odd,
            category = %event.solution.category,
            score = event.solution.score,
            correct = event.correct,
            "solved puzzle"
        );
    }

    fn finished(&mut self, report: &EvaluationReport) {
        tracing::info!(
            correct = report.num_correct,
            incorrect = report.num_incorrect,
            total = report.num_total,
            "evaluation finished"
        );
    }
}

impl<F> ProgressLogger for F
where
    F: FnMut(&ProgressEvent<'_>),
{
    fn puzzle_solved(&mut self, event: &ProgressEvent<'_>) {
        self(event)
    }
}
