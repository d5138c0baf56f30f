//! Per-taxonomy closure caches.
//!
//! Each taxonomy instance owns one [`TaxonomyCache`] for its whole lifetime.
//! Entries are only ever added, and only once the closure for that label has
//! been fully verified: a backend that fails half-way through a traversal
//! must return the error instead of inserting what it has so far.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Label, LabelSet, Taxonomy};

/// Verified transitive closures keyed by label.
#[derive(Debug, Default, Clone)]
pub struct ClosureCache {
    entries: HashMap<Label, LabelSet>,
}

impl ClosureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&LabelSet> {
        self.entries.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Record the complete closure of `label`.
    ///
    /// An existing entry is never replaced.
    pub fn insert(&mut self, label: impl Into<Label>, closure: LabelSet) -> &LabelSet {
        self.entries.entry(label.into()).or_insert(closure)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The two caches every taxonomy backend carries.
#[derive(Debug, Default, Clone)]
pub struct TaxonomyCache {
    /// label -> broader categories above it, up to the root
    pub ancestors: ClosureCache,
    /// label -> leaf instances below it
    pub descendants: ClosureCache,
}

impl TaxonomyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            ancestors: self.ancestors.len(),
            descendants: self.descendants.len(),
        }
    }
}

/// Entry counts of a [`TaxonomyCache`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub ancestors: usize,
    pub descendants: usize,
}

/// Pre-populate the ancestor cache from a list of hub categories.
///
/// Backends that fill intermediate entries bottom-up make every later query
/// passing through a warmed hub cheap. Returns how many hubs were resolved;
/// failures are logged and skipped.
pub fn warm_ancestors<T, I>(taxonomy: &mut T, hubs: I) -> usize
where
    T: Taxonomy + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut warmed = 0;
    for hub in hubs {
        let hub = hub.as_ref();
        match taxonomy.try_ancestor_categories(hub) {
            Ok(ancestors) => {
                tracing::debug!(hub, ancestors = ancestors.len(), "warmed ancestor cache");
                warmed += 1;
            }
            Err(err) => tracing::warn!(hub, error = %err, "failed to warm ancestor cache"),
        }
    }
    warmed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> LabelSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn insert_keeps_first_complete_entry() {
        let mut cache = ClosureCache::new();
        cache.insert("Poodle", set(&["Water dogs"]));
        cache.insert("Poodle", set(&["Something else"]));

        assert_eq!(cache.get("Poodle"), Some(&set(&["Water dogs"])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stats_count_both_caches() {
        let mut cache = TaxonomyCache::new();
        cache.ancestors.insert("a", set(&["b"]));
        cache.ancestors.insert("b", LabelSet::new());
        cache.descendants.insert("b", set(&["a"]));

        assert_eq!(
            cache.stats(),
            CacheStats {
                ancestors: 2,
                descendants: 1
            }
        );
    }
}
