use oddoneout_taxonomy::{lowest_common_ancestor, CommonAncestor, Taxonomy};
use serde::{Deserialize, Serialize};

/// How tightly a group hangs together once a candidate odd one is excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// `1 / ancestor.size`, in `(0, 1]`.
    pub value: f64,
    pub ancestor: CommonAncestor,
}

impl Score {
    fn from_ancestor(ancestor: CommonAncestor) -> Self {
        // A backend reporting an empty corpus still yields a finite score.
        let value = 1.0 / ancestor.size.max(1) as f64;
        Self { value, ancestor }
    }
}

/// Scores groups by the size of their lowest common ancestor.
pub struct TaxonomySimilarity<T> {
    taxonomy: T,
}

impl<T: Taxonomy> TaxonomySimilarity<T> {
    pub fn new(taxonomy: T) -> Self {
        Self { taxonomy }
    }

    pub fn score<S: AsRef<str>>(&mut self, members: &[S], odd: &str) -> Score {
        let ancestor = lowest_common_ancestor(&mut self.taxonomy, members, odd);
        Score::from_ancestor(ancestor)
    }

    pub fn taxonomy(&self) -> &T {
        &self.taxonomy
    }

    pub fn taxonomy_mut(&mut self) -> &mut T {
        &mut self.taxonomy
    }

    pub fn into_inner(self) -> T {
        self.taxonomy
    }
}
