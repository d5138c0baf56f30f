//! Extracted `page` and `categorylinks` tables.
//!
//! One row per line, tab-separated, values as they appear in the SQL dump
//! (string columns keep their single quotes):
//!
//! ```text
//! page:          id  ns  title  is_redirect  len  content_model  lang
//! categorylinks: from_id  category_title  member_type
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use oddoneout_wikidump::{
    CategoryLink, CategoryLinksTable, MemberType, PageId, PageRecord, PageTable, WikiDumpConfig,
    WikiDumpTaxonomy,
};

pub const PAGE_FIELDS: usize = 7;
pub const CATEGORYLINKS_FIELDS: usize = 3;

fn split_row(line: &str, expected: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != expected {
        bail!("expected {expected} tab-separated fields, found {}", fields.len());
    }
    Ok(fields)
}

pub fn parse_page_row(line: &str) -> Result<PageRecord> {
    let fields = split_row(line, PAGE_FIELDS)?;
    let id = fields[0]
        .parse::<u64>()
        .with_context(|| format!("invalid page id `{}`", fields[0]))?;
    let namespace = fields[1]
        .parse::<i32>()
        .with_context(|| format!("invalid namespace `{}`", fields[1]))?;
    let is_redirect = match fields[3] {
        "0" => false,
        "1" => true,
        other => bail!("invalid is_redirect flag `{other}`"),
    };
    Ok(PageRecord {
        id,
        namespace,
        title: fields[2].to_string(),
        is_redirect,
    })
}

pub fn parse_category_link_row(line: &str) -> Result<CategoryLink> {
    let fields = split_row(line, CATEGORYLINKS_FIELDS)?;
    let from = fields[0]
        .parse::<PageId>()
        .with_context(|| format!("invalid page id `{}`", fields[0]))?;
    let member_type = fields[2].parse::<MemberType>()?;
    Ok(CategoryLink::new(from, fields[1], member_type))
}

/// Non-blank lines with their 1-based line numbers.
fn rows<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) => (!line.trim().is_empty()).then(|| Ok((i + 1, line))),
            Err(err) => Some(Err(anyhow::Error::new(err).context(format!("line {}", i + 1)))),
        })
}

pub fn parse_page_table<R: BufRead>(reader: R) -> Result<PageTable> {
    let mut pages = PageTable::new();
    for row in rows(reader) {
        let (line_no, line) = row?;
        let record = parse_page_row(&line).with_context(|| format!("line {line_no}"))?;
        pages
            .insert(record)
            .with_context(|| format!("line {line_no}"))?;
    }
    Ok(pages)
}

pub fn parse_category_links<R: BufRead>(reader: R) -> Result<CategoryLinksTable> {
    let mut links = CategoryLinksTable::new();
    for row in rows(reader) {
        let (line_no, line) = row?;
        let link = parse_category_link_row(&line).with_context(|| format!("line {line_no}"))?;
        links.insert(link);
    }
    Ok(links)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub fn read_page_table(path: &Path) -> Result<PageTable> {
    let pages = parse_page_table(open(path)?)
        .with_context(|| format!("failed to read page table {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        pages = pages.len(),
        skipped = pages.skipped(),
        "loaded page table"
    );
    Ok(pages)
}

pub fn read_category_links(path: &Path) -> Result<CategoryLinksTable> {
    let links = parse_category_links(open(path)?)
        .with_context(|| format!("failed to read categorylinks table {}", path.display()))?;
    tracing::info!(path = %path.display(), links = links.len(), "loaded categorylinks table");
    Ok(links)
}

/// Read both tables and build the taxonomy over them.
pub fn load_wikidump(
    pages_path: &Path,
    categorylinks_path: &Path,
    config: WikiDumpConfig,
) -> Result<WikiDumpTaxonomy> {
    let pages = read_page_table(pages_path)?;
    let links = read_category_links(categorylinks_path)?;
    let taxonomy = WikiDumpTaxonomy::from_tables(pages, links, config)
        .context("failed to build wikidump taxonomy")?;
    Ok(taxonomy)
}
