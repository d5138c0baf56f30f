use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use oddoneout_taxonomy::{
    classify, lowest_common_ancestor, specificity, warm_ancestors, CommonAncestor, Label,
    LabelSet, NodeKind, Result, Taxonomy, TaxonomyCache, TaxonomyError,
};

/// Small in-memory taxonomy: `parents[x]` are the direct broader categories of `x`.
struct EdgeTaxonomy {
    root: Label,
    parents: BTreeMap<Label, Vec<Label>>,
    cache: TaxonomyCache,
    lookups: Cell<usize>,
}

impl EdgeTaxonomy {
    fn new(root: &str, edges: &[(&str, &str)]) -> Self {
        let mut parents: BTreeMap<Label, Vec<Label>> = BTreeMap::new();
        parents.entry(root.to_string()).or_default();
        for (child, parent) in edges {
            parents
                .entry(child.to_string())
                .or_default()
                .push(parent.to_string());
            parents.entry(parent.to_string()).or_default();
        }
        Self {
            root: root.to_string(),
            parents,
            cache: TaxonomyCache::new(),
            lookups: Cell::new(0),
        }
    }

    fn children(&self, label: &str) -> Vec<Label> {
        self.parents
            .iter()
            .filter(|(_, ps)| ps.iter().any(|p| p == label))
            .map(|(c, _)| c.clone())
            .collect()
    }
}

impl Taxonomy for EdgeTaxonomy {
    fn root(&self) -> Label {
        self.root.clone()
    }

    fn num_instances(&self) -> usize {
        self.parents
            .keys()
            .filter(|l| self.children(l).is_empty() && **l != self.root)
            .count()
    }

    fn try_ancestor_categories(&mut self, label: &str) -> Result<LabelSet> {
        if let Some(hit) = self.cache.ancestors.get(label) {
            return Ok(hit.clone());
        }
        if !self.parents.contains_key(label) {
            return Err(TaxonomyError::UnknownLabel(label.to_string()));
        }
        self.lookups.set(self.lookups.get() + 1);
        let mut out = LabelSet::new();
        let mut queue: VecDeque<Label> = self.parents[label].iter().cloned().collect();
        while let Some(next) = queue.pop_front() {
            if out.insert(next.clone()) {
                queue.extend(self.parents[&next].iter().cloned());
            }
        }
        out.remove(label);
        Ok(self.cache.ancestors.insert(label, out).clone())
    }

    fn try_descendant_instances(&mut self, label: &str) -> Result<LabelSet> {
        if let Some(hit) = self.cache.descendants.get(label) {
            return Ok(hit.clone());
        }
        if !self.parents.contains_key(label) {
            return Err(TaxonomyError::UnknownLabel(label.to_string()));
        }
        self.lookups.set(self.lookups.get() + 1);
        let mut out = LabelSet::new();
        let mut seen = BTreeSet::new();
        let mut stack = vec![label.to_string()];
        while let Some(next) = stack.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            let children = self.children(&next);
            if children.is_empty() {
                out.insert(next);
            } else {
                stack.extend(children);
            }
        }
        Ok(self.cache.descendants.insert(label, out).clone())
    }
}

fn colors() -> EdgeTaxonomy {
    EdgeTaxonomy::new(
        "Contents",
        &[
            ("Colors", "Contents"),
            ("Food", "Contents"),
            ("Rainbow colors", "Colors"),
            ("Web colors", "Colors"),
            ("Red", "Rainbow colors"),
            ("Orange", "Rainbow colors"),
            ("Yellow", "Rainbow colors"),
            ("Green", "Rainbow colors"),
            ("Blue", "Rainbow colors"),
            ("Cyan", "Rainbow colors"),
            ("Violet", "Rainbow colors"),
            ("Red", "Web colors"),
            ("Magenta", "Web colors"),
            ("Fruit", "Food"),
            ("Apple", "Fruit"),
            ("Pear", "Fruit"),
        ],
    )
}

#[test]
fn lca_picks_smallest_category_excluding_odd() {
    let mut taxonomy = colors();
    let result = lowest_common_ancestor(&mut taxonomy, &["Yellow", "Red", "Green", "Blue"], "Apple");
    assert_eq!(
        result,
        CommonAncestor {
            size: 7,
            category: "Rainbow colors".to_string()
        }
    );
}

#[test]
fn lca_falls_back_to_root_when_every_ancestor_covers_odd() {
    let mut taxonomy = colors();
    let n = taxonomy.num_instances();
    let result = lowest_common_ancestor(&mut taxonomy, &["Yellow", "Red", "Green", "Blue"], "Cyan");
    assert_eq!(
        result,
        CommonAncestor {
            size: n,
            category: "Contents".to_string()
        }
    );
}

#[test]
fn lca_skips_smaller_categories_that_contain_odd() {
    let mut taxonomy = EdgeTaxonomy::new(
        "Root",
        &[
            ("Small", "Root"),
            ("Large", "Root"),
            ("x", "Small"),
            ("y", "Small"),
            ("odd", "Small"),
            ("x", "Large"),
            ("y", "Large"),
            ("p", "Large"),
            ("q", "Large"),
        ],
    );
    let result = lowest_common_ancestor(&mut taxonomy, &["x", "y"], "odd");
    assert_eq!(
        result,
        CommonAncestor {
            size: 4,
            category: "Large".to_string()
        }
    );

    let result = lowest_common_ancestor(&mut taxonomy, &["x", "y"], "p");
    assert_eq!(result.category, "Small");
    assert_eq!(result.size, 3);
}

#[test]
fn lca_breaks_size_ties_by_label() {
    let mut taxonomy = EdgeTaxonomy::new(
        "Root",
        &[
            ("Beta", "Root"),
            ("Alpha", "Root"),
            ("x", "Alpha"),
            ("y", "Alpha"),
            ("x", "Beta"),
            ("y", "Beta"),
            ("z", "Root"),
        ],
    );
    let result = lowest_common_ancestor(&mut taxonomy, &["x", "y"], "z");
    assert_eq!(result.category, "Alpha");
    assert_eq!(result.size, 2);
}

#[test]
fn lca_with_unknown_member_falls_back_to_root() {
    let mut taxonomy = colors();
    let result = lowest_common_ancestor(&mut taxonomy, &["Red", "Misspeling"], "Apple");
    assert_eq!(result.category, "Contents");
}

#[test]
fn lca_with_no_members_falls_back_to_root() {
    let mut taxonomy = colors();
    let members: [&str; 0] = [];
    let result = lowest_common_ancestor(&mut taxonomy, &members, "Apple");
    assert_eq!(result, CommonAncestor::root(&taxonomy));
}

#[test]
fn lca_through_boxed_trait_object() {
    let mut taxonomy: Box<dyn Taxonomy> = Box::new(colors());
    let result = lowest_common_ancestor(&mut taxonomy, &["Apple", "Pear"], "Red");
    assert_eq!(result.category, "Fruit");
}

#[test]
fn classification_follows_specificity() {
    let mut taxonomy = colors();
    assert_eq!(classify(&mut taxonomy, "Apple"), NodeKind::Instance);
    assert_eq!(classify(&mut taxonomy, "Fruit"), NodeKind::Category);
    assert_eq!(classify(&mut taxonomy, "Misspeling"), NodeKind::Unknown);

    assert!(taxonomy.is_instance("Pear"));
    assert!(!taxonomy.is_instance("Fruit"));
    assert!(!taxonomy.is_instance("Misspeling"));
    assert!(taxonomy.is_category("Rainbow colors"));
    assert!(!taxonomy.is_category("Red"));
    assert!(!taxonomy.is_category("Misspeling"));

    assert_eq!(specificity(&mut taxonomy, "Red"), 0);
    assert_eq!(specificity(&mut taxonomy, "Web colors"), 2);
}

#[test]
fn failed_lookup_answers_empty_and_is_not_cached() {
    let mut taxonomy = colors();
    assert!(taxonomy.ancestor_categories("Misspeling").is_empty());
    assert_eq!(taxonomy.cache.stats().ancestors, 0);
}

#[test]
fn warming_counts_resolved_hubs_only() {
    let mut taxonomy = colors();
    let warmed = warm_ancestors(&mut taxonomy, ["Colors", "Fruit", "Nowhere"]);
    assert_eq!(warmed, 2);

    let before = taxonomy.lookups.get();
    let _ = taxonomy.ancestor_categories("Colors");
    assert_eq!(taxonomy.lookups.get(), before);
}
