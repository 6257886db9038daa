// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::ops::Range;

pub const FACET_ALL: &str = "all";

/// Accessor for a free-text searchable field.
pub type TextField<T> = fn(&T) -> &str;

/// A discrete filter dimension over one enum-valued field.
pub struct Facet<T> {
    pub key: &'static str,
    pub label: &'static str,
    pub values: Vec<&'static str>,
    pub field: fn(&T) -> &'static str,
}

impl<T> Facet<T> {
    pub fn new(
        key: &'static str,
        label: &'static str,
        values: impl IntoIterator<Item = &'static str>,
        field: fn(&T) -> &'static str,
    ) -> Self {
        Self {
            key,
            label,
            values: values.into_iter().collect(),
            field,
        }
    }

    /// Next choice in the cycle `all -> v0 -> v1 -> ... -> all`.
    pub fn next_choice(&self, current: &FacetChoice) -> FacetChoice {
        let next_index = match current {
            FacetChoice::All => 0,
            FacetChoice::Only(value) => match self.values.iter().position(|v| v == value) {
                Some(index) => index + 1,
                None => self.values.len(),
            },
        };
        match self.values.get(next_index) {
            Some(value) => FacetChoice::Only((*value).to_owned()),
            None => FacetChoice::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacetChoice {
    #[default]
    All,
    Only(String),
}

impl FacetChoice {
    pub fn parse(raw: &str) -> Self {
        if raw == FACET_ALL {
            Self::All
        } else {
            Self::Only(raw.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => FACET_ALL,
            Self::Only(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub query: String,
    pub facets: BTreeMap<String, FacetChoice>,
}

impl FilterState {
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_owned();
        self
    }

    pub fn with_facet(mut self, key: &str, raw: &str) -> Self {
        self.set_facet(key, FacetChoice::parse(raw));
        self
    }

    pub fn set_facet(&mut self, key: &str, choice: FacetChoice) {
        self.facets.insert(key.to_owned(), choice);
    }

    pub fn choice(&self, key: &str) -> &FacetChoice {
        const ALL: &FacetChoice = &FacetChoice::All;
        self.facets.get(key).unwrap_or(ALL)
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.facets.clear();
    }
}

/// Items matching the query and every non-`all` facet, in input order.
///
/// A facet key that the caller did not configure is treated as a missing
/// field: a non-`all` choice on it matches nothing.
pub fn filter<'a, T>(
    items: &'a [T],
    state: &FilterState,
    search_fields: &[TextField<T>],
    facets: &[Facet<T>],
) -> Vec<&'a T> {
    let needle = state.query.to_lowercase();
    let constraints = state
        .facets
        .iter()
        .filter_map(|(key, choice)| match choice {
            FacetChoice::All => None,
            FacetChoice::Only(value) => Some((
                facets.iter().find(|facet| facet.key == key.as_str()),
                value.as_str(),
            )),
        })
        .collect::<Vec<_>>();

    items
        .iter()
        .filter(|item| {
            matches_query(*item, &needle, search_fields)
                && constraints.iter().all(|(facet, value)| {
                    facet.is_some_and(|facet| (facet.field)(*item) == *value)
                })
        })
        .collect()
}

fn matches_query<T>(item: &T, needle: &str, search_fields: &[TextField<T>]) -> bool {
    if needle.is_empty() {
        return true;
    }
    search_fields
        .iter()
        .any(|field| field(item).to_lowercase().contains(needle))
}

/// Byte range in `haystack` of the first case-insensitive occurrence of
/// `needle_lower`, which must already be lowercase.
pub fn match_span(haystack: &str, needle_lower: &str) -> Option<Range<usize>> {
    if needle_lower.is_empty() {
        return None;
    }
    for (start, _) in haystack.char_indices() {
        let mut folded = String::new();
        for (offset, ch) in haystack[start..].char_indices() {
            folded.extend(ch.to_lowercase());
            if folded.len() >= needle_lower.len() {
                if folded.starts_with(needle_lower) {
                    return Some(start..start + offset + ch.len_utf8());
                }
                break;
            }
        }
    }
    None
}
