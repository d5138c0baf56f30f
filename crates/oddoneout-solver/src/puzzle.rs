//! Puzzle records and datasets.

use oddoneout_taxonomy::Label;
use serde::{Deserialize, Serialize};

pub const GROUP_SIZE: usize = 4;

/// Fields per record: category, odd one out, then the group.
pub const RECORD_FIELDS: usize = GROUP_SIZE + 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("expected 6 fields (category, odd, 4 members), found {0}")]
    FieldCount(usize),

    #[error("field {0} is empty")]
    EmptyField(usize),
}

/// Four labels sharing `true_category`, and one (`true_odd`) that does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub true_odd: Label,
    pub true_category: Label,
    pub members: [Label; GROUP_SIZE],
}

impl Puzzle {
    pub fn new(
        true_odd: impl Into<Label>,
        members: [&str; GROUP_SIZE],
        true_category: impl Into<Label>,
    ) -> Self {
        Self {
            true_odd: true_odd.into(),
            true_category: true_category.into(),
            members: members.map(str::to_string),
        }
    }

    /// Parse a `[category, odd, m1, m2, m3, m4]` record.
    pub fn from_record<S: AsRef<str>>(fields: &[S]) -> Result<Self, PuzzleError> {
        if fields.len() != RECORD_FIELDS {
            return Err(PuzzleError::FieldCount(fields.len()));
        }
        let mut labels: Vec<Label> = Vec::with_capacity(RECORD_FIELDS);
        for (i, field) in fields.iter().enumerate() {
            let field = field.as_ref().trim();
            if field.is_empty() {
                return Err(PuzzleError::EmptyField(i));
            }
            labels.push(field.to_string());
        }

        let mut labels = labels.into_iter();
        let (Some(true_category), Some(true_odd)) = (labels.next(), labels.next()) else {
            return Err(PuzzleError::FieldCount(fields.len()));
        };
        let members: Vec<Label> = labels.collect();
        let members: [Label; GROUP_SIZE] = members
            .try_into()
            .map_err(|_| PuzzleError::FieldCount(fields.len()))?;

        Ok(Self {
            true_odd,
            true_category,
            members,
        })
    }

    /// Every label the solver may exclude: the members in order, then `true_odd`.
    pub fn candidates(&self) -> impl Iterator<Item = &Label> + '_ {
        self.members.iter().chain(std::iter::once(&self.true_odd))
    }

    /// The group left over when `excluded` (an index into [`Self::candidates`])
    /// is taken out.
    pub fn group_without(&self, excluded: usize) -> Vec<&str> {
        self.candidates()
            .enumerate()
            .filter(|(i, _)| *i != excluded)
            .map(|(_, label)| label.as_str())
            .collect()
    }
}

/// An ordered collection of puzzles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDataset {
    puzzles: Vec<Puzzle>,
}

impl PuzzleDataset {
    pub fn new(puzzles: Vec<Puzzle>) -> Self {
        Self { puzzles }
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Puzzle> {
        self.puzzles.iter()
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }
}

impl FromIterator<Puzzle> for PuzzleDataset {
    fn from_iter<I: IntoIterator<Item = Puzzle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PuzzleDataset {
    type Item = &'a Puzzle;
    type IntoIter = std::slice::Iter<'a, Puzzle>;

    fn into_iter(self) -> Self::IntoIter {
        self.puzzles.iter()
    }
}
