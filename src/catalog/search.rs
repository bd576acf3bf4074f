//! Search over the pristine catalog
//!
//! Filtering always starts from the unfiltered source, never from what is on
//! screen, so successive queries cannot compound.

use crate::models::{Category, Endpoint};

/// Result of filtering the pristine catalog
#[derive(Debug, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Empty query: render the pristine catalog verbatim
    All(&'a [Category]),
    Matches(Vec<Category>),
    NoResults,
}

/// Lower-cased, trimmed form of a raw query
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn filter_catalog<'a>(pristine: &'a [Category], query: &str) -> SearchOutcome<'a> {
    let needle = normalize(query);
    if needle.is_empty() {
        return SearchOutcome::All(pristine);
    }

    let matches: Vec<Category> = pristine
        .iter()
        .filter_map(|category| {
            let items: Vec<Endpoint> = category
                .items
                .iter()
                .filter(|item| matches(category, item, &needle))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| Category {
                name: category.name.clone(),
                items,
            })
        })
        .collect();

    if matches.is_empty() {
        SearchOutcome::NoResults
    } else {
        SearchOutcome::Matches(matches)
    }
}

fn matches(category: &Category, item: &Endpoint, needle: &str) -> bool {
    [
        item.name.as_deref(),
        item.desc.as_deref(),
        item.path.as_deref(),
        item.method.as_deref(),
        category.name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
