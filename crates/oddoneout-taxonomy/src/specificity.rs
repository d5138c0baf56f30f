//! Category vs. instance, derived from graph shape.
//!
//! `specificity(node)` is the number of leaf instances under `node`. A leaf's
//! descendant closure is just itself, which counts as 0; anything with at
//! least one member below it is a category. Labels the taxonomy cannot
//! resolve have an empty closure and are neither.

use serde::{Deserialize, Serialize};

use crate::{LabelSet, Taxonomy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Instance,
    Category,
    Unknown,
}

/// Specificity of `label` given its already computed descendant closure.
pub fn specificity_of(label: &str, descendants: &LabelSet) -> usize {
    if descendants.len() == 1 && descendants.contains(label) {
        0
    } else {
        descendants.len()
    }
}

pub fn specificity<T: Taxonomy + ?Sized>(taxonomy: &mut T, label: &str) -> usize {
    let descendants = taxonomy.descendant_instances(label);
    specificity_of(label, &descendants)
}

pub fn classify<T: Taxonomy + ?Sized>(taxonomy: &mut T, label: &str) -> NodeKind {
    let descendants = taxonomy.descendant_instances(label);
    if descendants.is_empty() {
        NodeKind::Unknown
    } else if specificity_of(label, &descendants) == 0 {
        NodeKind::Instance
    } else {
        NodeKind::Category
    }
}
