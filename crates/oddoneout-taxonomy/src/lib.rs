//! Odd-one-out taxonomy core.
//!
//! A taxonomy is a category graph discovered lazily from some backend. Nodes
//! are either broad categories or leaf instances, identified only by their
//! label. The core operations are two closures:
//!
//! ```text
//!            Contents (root)
//!                 │  broader
//!        ┌────────┴────────┐
//!     Colors             Dogs
//!        │                 │
//!  Rainbow colors     Water dogs
//!     │    │            │     │
//!   Red  Blue        Poodle  Wetterhoun     ← instances
//! ```
//!
//! - `ancestor_categories(x)`: every category strictly above `x`
//! - `descendant_instances(c)`: every instance below `c` (or `{c}` for a leaf)
//!
//! Both are memoized per taxonomy instance (see [`cache`]). On top of them sit
//! the [`specificity`] classifier and the [`lca`] search used by the puzzle
//! solver.
//!
//! ## Failure policy
//!
//! Backends implement the fallible `try_*` forms. The infallible forms log a
//! failure, answer with the empty set and leave the cache unpopulated, so the
//! next call retries instead of remembering a wrong empty answer.

pub mod cache;
pub mod error;
pub mod lca;
pub mod specificity;

use std::collections::BTreeSet;

pub use cache::{warm_ancestors, CacheStats, ClosureCache, TaxonomyCache};
pub use error::{Result, TaxonomyError};
pub use lca::{common_ancestors, lowest_common_ancestor, CommonAncestor};
pub use specificity::{classify, specificity, specificity_of, NodeKind};

/// String identity of a taxonomy node.
pub type Label = String;

/// Ordered so closures print and compare deterministically.
pub type LabelSet = BTreeSet<Label>;

/// Contract every taxonomy backend satisfies.
///
/// The LCA search, specificity and the solver depend only on this trait.
pub trait Taxonomy {
    /// The fixed top category of this backend.
    fn root(&self) -> Label;

    /// Corpus size estimate: the number of instances under the root.
    ///
    /// Backends may report a configured constant instead of a live count.
    fn num_instances(&self) -> usize;

    /// Broader categories strictly above `label`, up to and including the root.
    ///
    /// Empty for the root itself. Successful results are cached.
    fn try_ancestor_categories(&mut self, label: &str) -> Result<LabelSet>;

    /// Leaf instances under `label`; `{label}` when `label` is itself a leaf.
    ///
    /// Successful results are cached.
    fn try_descendant_instances(&mut self, label: &str) -> Result<LabelSet>;

    fn cache_stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn ancestor_categories(&mut self, label: &str) -> LabelSet {
        self.try_ancestor_categories(label).unwrap_or_else(|err| {
            tracing::warn!(label, error = %err, "ancestor lookup failed");
            LabelSet::new()
        })
    }

    fn descendant_instances(&mut self, label: &str) -> LabelSet {
        self.try_descendant_instances(label).unwrap_or_else(|err| {
            tracing::warn!(label, error = %err, "descendant lookup failed");
            LabelSet::new()
        })
    }

    fn is_instance(&mut self, label: &str) -> bool {
        classify(self, label) == NodeKind::Instance
    }

    fn is_category(&mut self, label: &str) -> bool {
        classify(self, label) == NodeKind::Category
    }
}

impl<T: Taxonomy + ?Sized> Taxonomy for &mut T {
    fn root(&self) -> Label {
        (**self).root()
    }

    fn num_instances(&self) -> usize {
        (**self).num_instances()
    }

    fn try_ancestor_categories(&mut self, label: &str) -> Result<LabelSet> {
        (**self).try_ancestor_categories(label)
    }

    fn try_descendant_instances(&mut self, label: &str) -> Result<LabelSet> {
        (**self).try_descendant_instances(label)
    }

    fn cache_stats(&self) -> CacheStats {
        (**self).cache_stats()
    }

    fn is_instance(&mut self, label: &str) -> bool {
        (**self).is_instance(label)
    }

    fn is_category(&mut self, label: &str) -> bool {
        (**self).is_category(label)
    }
}

impl<T: Taxonomy + ?Sized> Taxonomy for Box<T> {
    fn root(&self) -> Label {
        (**self).root()
    }

    fn num_instances(&self) -> usize {
        (**self).num_instances()
    }

    fn try_ancestor_categories(&mut self, label: &str) -> Result<LabelSet> {
        (**self).try_ancestor_categories(label)
    }

    fn try_descendant_instances(&mut self, label: &str) -> Result<LabelSet> {
        (**self).try_descendant_instances(label)
    }

    fn cache_stats(&self) -> CacheStats {
        (**self).cache_stats()
    }

    fn is_instance(&mut self, label: &str) -> bool {
        (**self).is_instance(label)
    }

    fn is_category(&mut self, label: &str) -> bool {
        (**self).is_category(label)
    }
}
