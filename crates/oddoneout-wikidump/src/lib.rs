//! Taxonomy over tables extracted from a Wikipedia dump.
//!
//! Two relations are loaded up front:
//!
//! - `page`: `(id, namespace, title)`; categories live in namespace 14
//! - `categorylinks`: `(from_id, category_title, member_type)`
//!
//! Walking up goes page id -> category titles -> category page id -> ...;
//! walking down goes category title -> member ids -> titles. Administrative
//! namespaces are dropped while the page table is built, and links from
//! dropped pages are pruned when the index is assembled, so neither ever
//! shows up as an instance or a category.

pub mod tables;

use std::collections::{HashSet, VecDeque};

use oddoneout_taxonomy::{
    CacheStats, Label, LabelSet, Result, Taxonomy, TaxonomyCache, TaxonomyError,
};

pub use tables::{
    is_metadata_namespace, CategoryLink, CategoryLinksTable, Member, MemberType, PageId,
    PageRecord, PageTable, TableError, NS_CATEGORY, NS_MAIN,
};

pub const DEFAULT_ROOT: &str = "Contents";

#[derive(Debug, Clone)]
pub struct WikiDumpConfig {
    pub root: Label,
    /// Corpus size; counted from the root's closure when `None`.
    pub num_instances: Option<usize>,
}

impl Default for WikiDumpConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            num_instances: None,
        }
    }
}

impl WikiDumpConfig {
    pub fn with_root(root: impl Into<Label>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Page and categorylinks tables, pruned against each other.
#[derive(Debug, Default, Clone)]
pub struct WikiDumpIndex {
    pages: PageTable,
    links: CategoryLinksTable,
}

impl WikiDumpIndex {
    pub fn new(pages: PageTable, mut links: CategoryLinksTable) -> Self {
        let dropped = links.retain_members_in(&pages);
        tracing::debug!(
            pages = pages.len(),
            skipped_pages = pages.skipped(),
            links = links.len(),
            dropped_links = dropped,
            "built wikidump index"
        );
        Self { pages, links }
    }

    pub fn pages(&self) -> &PageTable {
        &self.pages
    }

    pub fn links(&self) -> &CategoryLinksTable {
        &self.links
    }

    /// Titles of the categories the page(s) titled `title` are filed under,
    /// in any namespace.
    fn parents_of(&self, title: &str) -> impl Iterator<Item = &Label> + '_ {
        self.pages
            .by_title(title)
            .flat_map(move |page| self.links.categories_of(page.id))
    }

    /// Parents of the Category page titled `category`. An article sharing the
    /// title contributes nothing.
    fn category_parents(&self, category: &str) -> impl Iterator<Item = &Label> + '_ {
        self.pages
            .category_page(category)
            .into_iter()
            .flat_map(move |page| self.links.categories_of(page.id))
    }

    fn is_known(&self, title: &str) -> bool {
        self.pages.by_title(title).next().is_some() || self.has_members(title)
    }

    /// Has at least one page or sub-category member.
    fn has_members(&self, category: &str) -> bool {
        self.links
            .members_of(category)
            .iter()
            .any(|m| m.member_type != MemberType::File)
    }

    fn title_of(&self, id: PageId) -> Option<&Label> {
        self.pages.get(id).map(|page| &page.title)
    }
}

pub struct WikiDumpTaxonomy {
    index: WikiDumpIndex,
    root: Label,
    num_instances: usize,
    cache: TaxonomyCache,
}

impl WikiDumpTaxonomy {
    /// Builds the taxonomy; counts the corpus from the root unless configured.
    pub fn new(index: WikiDumpIndex, config: WikiDumpConfig) -> std::result::Result<Self, TableError> {
        if !index.has_members(&config.root) {
            return Err(TableError::MissingRoot(config.root));
        }

        let mut taxonomy = Self {
            index,
            root: config.root,
            num_instances: 0,
            cache: TaxonomyCache::new(),
        };
        taxonomy.num_instances = match config.num_instances {
            Some(n) => n,
            None => {
                let root = taxonomy.root.clone();
                let instances = taxonomy
                    .try_descendant_instances(&root)
                    .map(|set| set.len())
                    .map_err(|_| TableError::MissingRoot(root))?;
                tracing::info!(root = %taxonomy.root, instances, "counted corpus under root");
                instances
            }
        };
        Ok(taxonomy)
    }

    pub fn from_tables(
        pages: PageTable,
        links: CategoryLinksTable,
        config: WikiDumpConfig,
    ) -> std::result::Result<Self, TableError> {
        Self::new(WikiDumpIndex::new(pages, links), config)
    }

    pub fn index(&self) -> &WikiDumpIndex {
        &self.index
    }

    /// Breadth-first walk up the membership table. Only `label` itself may
    /// match pages outside the Category namespace; every title reached after
    /// that is a category. The root is recorded but not expanded.
    fn collect_ancestors(&self, label: &str) -> LabelSet {
        let mut closure = LabelSet::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&Label> = self.index.parents_of(label).collect();

        while let Some(category) = queue.pop_front() {
            if !visited.insert(category.as_str()) {
                continue;
            }
            closure.insert(category.clone());
            if *category == self.root {
                continue;
            }
            // A cached closure for a shared title also holds the article's parents.
            if !self.index.pages.has_content_page(category) {
                if let Some(hit) = self.cache.ancestors.get(category) {
                    closure.extend(hit.iter().cloned());
                    continue;
                }
            }
            queue.extend(self.index.category_parents(category));
        }

        closure.remove(label);
        closure
    }

    /// Depth-first walk down from `category`, using member types to tell
    /// leaves from sub-categories.
    fn collect_descendants(&self, category: &str) -> LabelSet {
        let mut instances = LabelSet::new();
        let mut visited: HashSet<&str> = HashSet::from([category]);
        let mut stack: Vec<&str> = vec![category];

        while let Some(current) = stack.pop() {
            if current != category {
                if let Some(hit) = self.cache.descendants.get(current) {
                    instances.extend(hit.iter().cloned());
                    continue;
                }
            }
            for member in self.index.links.members_of(current) {
                let Some(title) = self.index.title_of(member.id) else {
                    continue;
                };
                match member.member_type {
                    MemberType::Page => {
                        instances.insert(title.clone());
                    }
                    MemberType::Subcat => {
                        if visited.insert(title.as_str()) {
                            stack.push(title.as_str());
                        }
                    }
                    MemberType::File => {}
                }
            }
        }

        tracing::debug!(
            category,
            instances = instances.len(),
            categories = visited.len(),
            "collected descendant instances"
        );
        instances
    }
}

impl Taxonomy for WikiDumpTaxonomy {
    fn root(&self) -> Label {
        self.root.clone()
    }

    fn num_instances(&self) -> usize {
        self.num_instances
    }

    fn try_ancestor_categories(&mut self, label: &str) -> Result<LabelSet> {
        if let Some(hit) = self.cache.ancestors.get(label) {
            return Ok(hit.clone());
        }
        if label == self.root {
            return Ok(self.cache.ancestors.insert(label, LabelSet::new()).clone());
        }
        if !self.index.is_known(label) {
            return Err(TaxonomyError::UnknownLabel(label.to_string()));
        }

        let closure = self.collect_ancestors(label);
        Ok(self.cache.ancestors.insert(label, closure).clone())
    }

    fn try_descendant_instances(&mut self, label: &str) -> Result<LabelSet> {
        if let Some(hit) = self.cache.descendants.get(label) {
            return Ok(hit.clone());
        }

        let closure = if self.index.has_members(label) {
            self.collect_descendants(label)
        } else if self.index.pages.has_content_page(label) {
            LabelSet::from([label.to_string()])
        } else {
            return Err(TaxonomyError::UnknownLabel(label.to_string()));
        };

        Ok(self.cache.descendants.insert(label, closure).clone())
    }

    fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// True when an article carries the title, even if a category shares it.
    fn is_instance(&mut self, label: &str) -> bool {
        self.index.pages.has_content_page(label)
    }

    fn is_category(&mut self, label: &str) -> bool {
        self.index.has_members(label)
    }
}
