//! Boundary adapter: turns files on disk into taxonomy tables and puzzles.
//!
//! Inputs are untrusted. Every reader validates row shape and reports the
//! offending line; nothing past this crate re-checks structure.
//!
//! Downloading dumps and extracting the tables from SQL is done elsewhere;
//! this crate starts from the extracted, tab-separated files.

pub mod dump;
pub mod puzzles;

pub use dump::{
    load_wikidump, parse_category_link_row, parse_category_links, parse_page_row,
    parse_page_table, read_category_links, read_page_table, CATEGORYLINKS_FIELDS, PAGE_FIELDS,
};
pub use puzzles::{parse_puzzles, read_puzzles};
