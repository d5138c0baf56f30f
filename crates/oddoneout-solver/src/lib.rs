//! Odd-one-out puzzle solving over a [`Taxonomy`](oddoneout_taxonomy::Taxonomy).
//!
//! A puzzle is five labels, four of which share a category. The solver tries
//! each label as the odd one out, scores the remaining four by the size of
//! their lowest common ancestor that excludes it (`1 / size`), and picks the
//! exclusion with the highest score:
//!
//! ```text
//! solve_puzzles ─▶ solve_puzzle ─▶ TaxonomySimilarity::score ─▶ lowest_common_ancestor
//!                      (x5)                                        ─▶ Taxonomy closures
//! ```

pub mod progress;
pub mod puzzle;
pub mod similarity;
pub mod solve;

pub use progress::{ProgressEvent, ProgressLogger, SilentLogger, TracingLogger};
pub use puzzle::{Puzzle, PuzzleDataset, PuzzleError, GROUP_SIZE, RECORD_FIELDS};
pub use similarity::{Score, TaxonomySimilarity};
pub use solve::{solve_puzzle, solve_puzzles, EvaluationReport, Solution};
