// List projection
//
// Pure derivation of the view list from raw data plus user input. No side
// effects, no I/O; given identical inputs the output is byte-for-byte
// reproducible.

use crate::models::Item;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field the projection sorts by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Title,
    YearPublished,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::YearPublished => "year_published",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for sort key names that don't map to a field.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortKey::Title),
            "year_published" => Ok(SortKey::YearPublished),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

/// Derive the list actually shown from raw data, search term, and sort key.
///
/// 1. Filter: keep items whose title, case-folded, contains the case-folded
///    search term as a substring. An empty term matches every item.
/// 2. Sort: stable sort by the selected field with a proper three-way
///    comparison, so items with equal field values keep their original
///    relative order.
pub fn project(data: &[Item], search_term: &str, sort_key: SortKey) -> Vec<Item> {
    let needle = search_term.to_lowercase();
    let mut view: Vec<Item> = data
        .iter()
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    view.sort_by(|a, b| compare_by(a, b, sort_key));
    view
}

fn compare_by(a: &Item, b: &Item, sort_key: SortKey) -> Ordering {
    match sort_key {
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::YearPublished => a.year_published.cmp(&b.year_published),
    }
}
