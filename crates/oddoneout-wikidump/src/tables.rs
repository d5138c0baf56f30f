//! In-memory page and categorylinks tables.
//!
//! Both tables are indexed in both directions so that walking up
//! (page -> its categories) and walking down (category -> its members) are
//! hash lookups.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use oddoneout_taxonomy::Label;
use serde::{Deserialize, Serialize};

pub type PageId = u64;

pub const NS_MAIN: i32 = 0;
pub const NS_CATEGORY: i32 = 14;

/// Administrative namespaces: virtual (`Special`, `Media`), every talk
/// namespace (odd numbers) and User/Project/File/MediaWiki/Template/Help
/// (2..=13). Category (14) and custom content namespaces such as
/// Cookbook (102) are kept.
pub fn is_metadata_namespace(namespace: i32) -> bool {
    namespace < 0 || namespace % 2 != 0 || (2..=13).contains(&namespace)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("duplicate page id {0}")]
    DuplicatePage(PageId),

    #[error("unknown member type `{0}` (expected page, subcat or file)")]
    UnknownMemberType(String),

    #[error("root category `{0}` has no members")]
    MissingRoot(Label),
}

// ============================================================================
// Pages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: PageId,
    pub namespace: i32,
    pub title: Label,
    pub is_redirect: bool,
}

impl PageRecord {
    pub fn new(id: PageId, namespace: i32, title: impl Into<Label>) -> Self {
        Self {
            id,
            namespace,
            title: title.into(),
            is_redirect: false,
        }
    }

    pub fn is_category(&self) -> bool {
        self.namespace == NS_CATEGORY
    }
}

#[derive(Debug, Default, Clone)]
pub struct PageTable {
    rows: Vec<PageRecord>,
    by_id: HashMap<PageId, usize>,
    by_title: HashMap<Label, Vec<usize>>,
    skipped: usize,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page. Pages in metadata namespaces are dropped (returns `false`).
    pub fn insert(&mut self, record: PageRecord) -> Result<bool, TableError> {
        if is_metadata_namespace(record.namespace) {
            self.skipped += 1;
            return Ok(false);
        }
        if self.by_id.contains_key(&record.id) {
            return Err(TableError::DuplicatePage(record.id));
        }
        let row = self.rows.len();
        self.by_id.insert(record.id, row);
        self.by_title
            .entry(record.title.clone())
            .or_default()
            .push(row);
        self.rows.push(record);
        Ok(true)
    }

    pub fn get(&self, id: PageId) -> Option<&PageRecord> {
        self.by_id.get(&id).map(|&row| &self.rows[row])
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Every kept page carrying `title`, across namespaces.
    pub fn by_title<'a>(&'a self, title: &str) -> impl Iterator<Item = &'a PageRecord> + 'a {
        self.by_title
            .get(title)
            .into_iter()
            .flatten()
            .map(move |&row| &self.rows[row])
    }

    pub fn category_page(&self, title: &str) -> Option<&PageRecord> {
        self.by_title(title).find(|p| p.is_category())
    }

    pub fn has_content_page(&self, title: &str) -> bool {
        self.by_title(title).any(|p| !p.is_category())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows dropped by namespace filtering.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

// ============================================================================
// Category links
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    Page,
    Subcat,
    File,
}

impl FromStr for MemberType {
    type Err = TableError;

    /// Accepts the dump spelling with or without SQL quotes (`'subcat'`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('\'') {
            "page" => Ok(Self::Page),
            "subcat" => Ok(Self::Subcat),
            "file" => Ok(Self::File),
            other => Err(TableError::UnknownMemberType(other.to_string())),
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Page => "page",
            Self::Subcat => "subcat",
            Self::File => "file",
        };
        f.write_str(s)
    }
}

/// `from` is filed under the category titled `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLink {
    pub from: PageId,
    pub category: Label,
    pub member_type: MemberType,
}

impl CategoryLink {
    pub fn new(from: PageId, category: impl Into<Label>, member_type: MemberType) -> Self {
        Self {
            from,
            category: category.into(),
            member_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub id: PageId,
    pub member_type: MemberType,
}

#[derive(Debug, Default, Clone)]
pub struct CategoryLinksTable {
    /// page id -> titles of the categories it is filed under
    by_member: HashMap<PageId, Vec<Label>>,
    /// category title -> its members
    by_category: HashMap<Label, Vec<Member>>,
    len: usize,
}

impl CategoryLinksTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link; duplicates are ignored (returns `false`).
    pub fn insert(&mut self, link: CategoryLink) -> bool {
        let parents = self.by_member.entry(link.from).or_default();
        if parents.contains(&link.category) {
            return false;
        }
        parents.push(link.category.clone());
        self.by_category.entry(link.category).or_default().push(Member {
            id: link.from,
            member_type: link.member_type,
        });
        self.len += 1;
        true
    }

    /// Categories `id` is filed under.
    pub fn categories_of(&self, id: PageId) -> &[Label] {
        self.by_member.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn members_of(&self, category: &str) -> &[Member] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Drop links whose member page is not kept in `pages`.
    pub fn retain_members_in(&mut self, pages: &PageTable) -> usize {
        let before = self.len;
        self.by_member.retain(|id, _| pages.contains(*id));
        let mut len = 0;
        for members in self.by_category.values_mut() {
            members.retain(|m| pages.contains(m.id));
            len += members.len();
        }
        self.by_category.retain(|_, members| !members.is_empty());
        self.len = len;
        before - len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_namespaces_are_filtered() {
        assert!(!is_metadata_namespace(NS_MAIN));
        assert!(!is_metadata_namespace(NS_CATEGORY));
        assert!(!is_metadata_namespace(102));
        for ns in [-2, -1, 1, 2, 3, 4, 6, 8, 10, 12, 13, 15, 103] {
            assert!(is_metadata_namespace(ns), "namespace {ns}");
        }

        let mut pages = PageTable::new();
        assert!(pages.insert(PageRecord::new(1, 0, "Pupusa")).unwrap());
        assert!(!pages.insert(PageRecord::new(2, 10, "Recipe_summary")).unwrap());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages.skipped(), 1);
        assert!(pages.get(2).is_none());
    }

    #[test]
    fn pages_are_indexed_by_id_and_title() {
        let mut pages = PageTable::new();
        pages.insert(PageRecord::new(7, 0, "Recipes")).unwrap();
        pages.insert(PageRecord::new(8, 14, "Recipes")).unwrap();

        assert_eq!(pages.get(7).map(|p| p.namespace), Some(0));
        assert_eq!(pages.category_page("Recipes").map(|p| p.id), Some(8));
        assert!(pages.has_content_page("Recipes"));
        assert_eq!(pages.by_title("Recipes").count(), 2);
        assert_eq!(
            pages.insert(PageRecord::new(7, 0, "Again")),
            Err(TableError::DuplicatePage(7))
        );
    }

    #[test]
    fn member_type_parses_dump_spelling() {
        assert_eq!("'subcat'".parse::<MemberType>(), Ok(MemberType::Subcat));
        assert_eq!("page".parse::<MemberType>(), Ok(MemberType::Page));
        assert_eq!(" 'file' ".parse::<MemberType>(), Ok(MemberType::File));
        assert!("'portal'".parse::<MemberType>().is_err());
    }

    #[test]
    fn links_are_indexed_both_ways_and_pruned() {
        let mut links = CategoryLinksTable::new();
        assert!(links.insert(CategoryLink::new(1, "Soups", MemberType::Page)));
        assert!(!links.insert(CategoryLink::new(1, "Soups", MemberType::Page)));
        links.insert(CategoryLink::new(2, "Soups", MemberType::Page));
        links.insert(CategoryLink::new(3, "Recipes", MemberType::Subcat));

        assert_eq!(links.categories_of(1), ["Soups".to_string()]);
        assert_eq!(links.members_of("Soups").len(), 2);
        assert_eq!(links.len(), 3);

        let mut pages = PageTable::new();
        pages.insert(PageRecord::new(1, 0, "Borscht")).unwrap();
        pages.insert(PageRecord::new(3, 14, "Soups")).unwrap();
        assert_eq!(links.retain_members_in(&pages), 1);
        assert_eq!(links.members_of("Soups").len(), 1);
        assert!(links.categories_of(2).is_empty());
    }
}
