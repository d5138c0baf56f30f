//! Odd-one-out puzzle files.
//!
//! Each line is `category, odd, member1, member2, member3, member4`. Files
//! from the odd-man-out corpus are tab-separated; hand-written ones often use
//! commas. A line containing a tab is split on tabs only, so labels such as
//! `Whole,_Roasted_Turkey` survive intact.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use oddoneout_solver::{Puzzle, PuzzleDataset};
use regex::Regex;

pub fn parse_puzzles<R: BufRead>(reader: R) -> Result<PuzzleDataset> {
    let comma = Regex::new(r"\s*,\s*")?;

    let mut puzzles = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.with_context(|| format!("line {line_no}"))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = if line.contains('\t') {
            line.split('\t').filter(|f| !f.trim().is_empty()).collect()
        } else {
            comma.split(line).collect()
        };
        let puzzle = Puzzle::from_record(&fields).with_context(|| format!("line {line_no}"))?;
        puzzles.push(puzzle);
    }
    Ok(PuzzleDataset::new(puzzles))
}

pub fn read_puzzles(path: &Path) -> Result<PuzzleDataset> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let dataset = parse_puzzles(BufReader::new(file))
        .with_context(|| format!("failed to read puzzles from {}", path.display()))?;
    tracing::info!(path = %path.display(), puzzles = dataset.len(), "loaded puzzles");
    Ok(dataset)
}
