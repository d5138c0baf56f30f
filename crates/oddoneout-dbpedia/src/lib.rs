//! DBpedia-backed taxonomy.
//!
//! The category graph lives behind a public SPARQL endpoint and is discovered
//! one edge query at a time:
//!
//! - ancestors are found by recursion with memoization: the direct parents of
//!   `x` are fetched, then each parent's own (cached) closure is unioned in.
//!   Every intermediate category that completes during the walk is cached on
//!   the way back up, so querying a few hub categories first makes later
//!   queries through them nearly free.
//! - descendants are found with an explicit worklist over sub-categories, so
//!   deep category trees never grow the call stack.
//!
//! The category graph has cycles. The ancestor walk keeps the labels it is
//! still expanding on a stack; a closure that reached one of those pending
//! labels is only cached once the walk returns to the label it reached.

pub mod graph;
pub mod query;
pub mod sparql;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use oddoneout_taxonomy::{
    CacheStats, Label, LabelSet, Result, Taxonomy, TaxonomyCache, TaxonomyError,
};

pub use graph::GraphQuery;
pub use sparql::{SparqlError, SparqlGraph};

pub const DEFAULT_ENDPOINT: &str = "https://dbpedia.org/sparql";
pub const DEFAULT_ROOT: &str = "Contents";
/// Wikipedia pages as of 25 Feb 2021. Counting the root's closure live takes
/// days of endpoint time, so the corpus size is configured.
pub const DEFAULT_NUM_INSTANCES: usize = 52_793_963;
pub const ENDPOINT_ENV: &str = "ODDONEOUT_SPARQL_ENDPOINT";

#[derive(Debug, Clone)]
pub struct DbpediaConfig {
    pub endpoint: String,
    pub root: Label,
    pub num_instances: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for DbpediaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            root: DEFAULT_ROOT.to_string(),
            num_instances: DEFAULT_NUM_INSTANCES,
            timeout: Duration::from_secs(60),
            user_agent: format!("oddoneout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DbpediaConfig {
    /// Defaults, with the endpoint taken from `ODDONEOUT_SPARQL_ENDPOINT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                config.endpoint = endpoint.to_string();
            }
        }
        config
    }
}

/// Bookkeeping for one top-level ancestor query.
#[derive(Default)]
struct AncestorWalk {
    /// label -> stack depth, for labels whose expansion is in progress
    pending: HashMap<Label, usize>,
    /// direct parents already fetched during this walk
    parents: HashMap<Label, Vec<Label>>,
}

/// Sentinel "low link" for a closure that reached no pending label.
const SETTLED: usize = usize::MAX;

pub struct DbpediaTaxonomy<G = SparqlGraph> {
    graph: G,
    config: DbpediaConfig,
    cache: TaxonomyCache,
}

impl DbpediaTaxonomy<SparqlGraph> {
    pub fn connect(config: DbpediaConfig) -> std::result::Result<Self, SparqlError> {
        let graph = SparqlGraph::new(&config)?;
        Ok(Self::with_graph(graph, config))
    }
}

impl<G: GraphQuery> DbpediaTaxonomy<G> {
    pub fn with_graph(graph: G, config: DbpediaConfig) -> Self {
        Self {
            graph,
            config,
            cache: TaxonomyCache::new(),
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn config(&self) -> &DbpediaConfig {
        &self.config
    }

    fn backend_error(label: &str, err: SparqlError) -> TaxonomyError {
        TaxonomyError::backend(label, err)
    }

    /// Direct parents: `skos:broader` for categories, `dct:subject` for articles.
    fn direct_parents(&self, label: &str, walk: &mut AncestorWalk) -> Result<Vec<Label>> {
        if let Some(parents) = walk.parents.get(label) {
            return Ok(parents.clone());
        }
        let is_concept = self
            .graph
            .is_concept(label)
            .map_err(|e| Self::backend_error(label, e))?;
        let parents = if is_concept {
            self.graph.broader_categories(label)
        } else {
            self.graph.subject_categories(label)
        }
        .map_err(|e| Self::backend_error(label, e))?;

        tracing::debug!(label, is_concept, parents = parents.len(), "fetched direct parents");
        walk.parents.insert(label.to_string(), parents.clone());
        Ok(parents)
    }

    /// Returns the closure of `label` and the shallowest pending depth it touched.
    fn ancestors_rec(&mut self, label: &str, walk: &mut AncestorWalk) -> Result<(LabelSet, usize)> {
        if let Some(hit) = self.cache.ancestors.get(label) {
            return Ok((hit.clone(), SETTLED));
        }
        if label == self.config.root {
            self.cache.ancestors.insert(label, LabelSet::new());
            return Ok((LabelSet::new(), SETTLED));
        }
        if let Some(&depth) = walk.pending.get(label) {
            return Ok((LabelSet::new(), depth));
        }

        let depth = walk.pending.len();
        walk.pending.insert(label.to_string(), depth);
        let expanded = self.expand_ancestors(label, walk);
        walk.pending.remove(label);

        let (closure, low) = expanded?;
        if low >= depth {
            tracing::debug!(label, ancestors = closure.len(), "cached ancestor closure");
            self.cache.ancestors.insert(label, closure.clone());
            Ok((closure, SETTLED))
        } else {
            Ok((closure, low))
        }
    }

    fn expand_ancestors(&mut self, label: &str, walk: &mut AncestorWalk) -> Result<(LabelSet, usize)> {
        let parents = self.direct_parents(label, walk)?;

        let mut closure = LabelSet::new();
        let mut low = SETTLED;
        for parent in parents {
            if parent == label || closure.contains(&parent) {
                continue;
            }
            let (above, parent_low) = self.ancestors_rec(&parent, walk)?;
            low = low.min(parent_low);
            closure.extend(above);
            closure.insert(parent);
        }
        closure.remove(label);
        Ok((closure, low))
    }

    fn collect_descendants(&mut self, category: &str) -> Result<LabelSet> {
        let mut instances = LabelSet::new();
        let mut visited: HashSet<Label> = HashSet::new();
        let mut frontier: Vec<Label> = vec![category.to_string()];
        visited.insert(category.to_string());

        while let Some(current) = frontier.pop() {
            if current != category {
                if let Some(hit) = self.cache.descendants.get(&current) {
                    instances.extend(hit.iter().cloned());
                    continue;
                }
            }

            let members = self
                .graph
                .member_instances(&current)
                .map_err(|e| Self::backend_error(&current, e))?;
            instances.extend(members);

            let subcategories = self
                .graph
                .member_subcategories(&current)
                .map_err(|e| Self::backend_error(&current, e))?;
            for sub in subcategories {
                if visited.insert(sub.clone()) {
                    frontier.push(sub);
                }
            }
        }

        tracing::debug!(
            category,
            instances = instances.len(),
            categories = visited.len(),
            "collected descendant instances"
        );
        Ok(instances)
    }
}

impl<G: GraphQuery> Taxonomy for DbpediaTaxonomy<G> {
    fn root(&self) -> Label {
        self.config.root.clone()
    }

    fn num_instances(&self) -> usize {
        self.config.num_instances
    }

    fn try_ancestor_categories(&mut self, label: &str) -> Result<LabelSet> {
        let mut walk = AncestorWalk::default();
        let (closure, _) = self.ancestors_rec(label, &mut walk)?;
        Ok(closure)
    }

    fn try_descendant_instances(&mut self, label: &str) -> Result<LabelSet> {
        if let Some(hit) = self.cache.descendants.get(label) {
            return Ok(hit.clone());
        }

        let is_concept = self
            .graph
            .is_concept(label)
            .map_err(|e| Self::backend_error(label, e))?;
        let closure = if is_concept {
            self.collect_descendants(label)?
        } else if self
            .graph
            .has_subject(label)
            .map_err(|e| Self::backend_error(label, e))?
        {
            LabelSet::from([label.to_string()])
        } else {
            return Err(TaxonomyError::UnknownLabel(label.to_string()));
        };

        Ok(self.cache.descendants.insert(label, closure).clone())
    }

    fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn is_instance(&mut self, label: &str) -> bool {
        let check = self
            .graph
            .is_concept(label)
            .and_then(|concept| Ok(!concept && self.graph.has_subject(label)?));
        check.unwrap_or_else(|err| {
            tracing::warn!(label, error = %err, "instance check failed");
            false
        })
    }

    fn is_category(&mut self, label: &str) -> bool {
        self.graph.is_concept(label).unwrap_or_else(|err| {
            tracing::warn!(label, error = %err, "category check failed");
            false
        })
    }
}
