//! Lowest common ancestor search.
//!
//! The answer for `(members, odd)` is the smallest category that every member
//! sits under and that does not also cover `odd`:
//!
//! 1. intersect the ancestor closures of all members,
//! 2. rank the surviving categories by specificity, ties broken by label,
//! 3. take the first one whose descendant closure lacks `odd`,
//! 4. otherwise fall back to the root.

use serde::{Deserialize, Serialize};

use crate::specificity::specificity_of;
use crate::{Label, LabelSet, Taxonomy};

/// Size and label of the category returned by [`lowest_common_ancestor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonAncestor {
    pub size: usize,
    pub category: Label,
}

impl CommonAncestor {
    /// The "everything is eventually related" answer.
    pub fn root<T: Taxonomy + ?Sized>(taxonomy: &T) -> Self {
        Self {
            size: taxonomy.num_instances(),
            category: taxonomy.root(),
        }
    }
}

/// Categories under which every member transitively sits.
pub fn common_ancestors<T, S>(taxonomy: &mut T, members: &[S]) -> LabelSet
where
    T: Taxonomy + ?Sized,
    S: AsRef<str>,
{
    let mut members = members.iter();
    let Some(first) = members.next() else {
        return LabelSet::new();
    };

    let mut common = taxonomy.ancestor_categories(first.as_ref());
    for member in members {
        if common.is_empty() {
            break;
        }
        let ancestors = taxonomy.ancestor_categories(member.as_ref());
        common.retain(|category| ancestors.contains(category));
    }
    common
}

pub fn lowest_common_ancestor<T, S>(taxonomy: &mut T, members: &[S], odd: &str) -> CommonAncestor
where
    T: Taxonomy + ?Sized,
    S: AsRef<str>,
{
    let root = taxonomy.root();
    let candidates = common_ancestors(taxonomy, members);

    // The root's closure is the whole corpus; its size is known without a walk
    // and the fallback below already answers with it.
    let mut ranked: Vec<(usize, Label, LabelSet)> = Vec::with_capacity(candidates.len());
    for category in candidates {
        if category == root {
            continue;
        }
        let descendants = taxonomy.descendant_instances(&category);
        let size = specificity_of(&category, &descendants);
        if size == 0 {
            tracing::debug!(%category, "skipping candidate with no resolvable instances");
            continue;
        }
        ranked.push((size, category, descendants));
    }
    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    for (size, category, descendants) in ranked {
        if !descendants.contains(odd) {
            tracing::debug!(%category, size, odd, "lowest common ancestor");
            return CommonAncestor { size, category };
        }
    }

    tracing::debug!(odd, "no common ancestor excludes the odd label; using root");
    CommonAncestor::root(taxonomy)
}
