//! Derived table view: free-text filter plus single-column sort.
//!
//! Everything here is a pure function of `(records, query, sort)`. The
//! controller recomputes the view on every state change instead of patching
//! a previously rendered list.

use std::cmp::Ordering;

use shared::domain::{Registrant, SortDirection, SortSpec};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Filtered and ordered copy of `records`.
pub fn view(records: &[Registrant], query: &str, sort: SortSpec) -> Vec<Registrant> {
    view_refs(records, query, sort).into_iter().cloned().collect()
}

/// Same as [`view`] but borrows from `records`.
pub fn view_refs<'a>(
    records: &'a [Registrant],
    query: &str,
    sort: SortSpec,
) -> Vec<&'a Registrant> {
    let needle = query.to_lowercase();
    let mut keyed: Vec<(CollationKey, &Registrant)> = records
        .iter()
        .filter(|r| matches_query(r, &needle))
        .map(|r| (CollationKey::new(r.field(sort.field)), r))
        .collect();

    // `sort_by` is stable, so equal keys keep input order in both directions.
    keyed.sort_by(|(a, _), (b, _)| match sort.direction {
        SortDirection::Ascending => a.cmp(b),
        SortDirection::Descending => b.cmp(a),
    });

    keyed.into_iter().map(|(_, r)| r).collect()
}

/// `needle` must already be lowercased. An empty needle matches everything.
pub fn matches_query(record: &Registrant, needle: &str) -> bool {
    needle.is_empty()
        || record
            .searchable_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Case-folded sort key ordering by base letters first, so accented names
/// sit next to their unaccented neighbours instead of after `z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationKey {
    base: String,
    folded: String,
}

impl CollationKey {
    pub fn new(text: &str) -> Self {
        let folded = text.to_lowercase();
        let base = folded.nfkd().filter(|c| !is_combining_mark(*c)).collect();
        Self { base, folded }
    }
}

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.base
            .cmp(&other.base)
            .then_with(|| self.folded.cmp(&other.folded))
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Why a rendered view has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoRegistrants,
    NoMatches,
}

impl EmptyState {
    pub fn classify(visible: usize, query: &str) -> Option<Self> {
        if visible > 0 {
            None
        } else if query.is_empty() {
            Some(EmptyState::NoRegistrants)
        } else {
            Some(EmptyState::NoMatches)
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoRegistrants => "No registrants available.",
            EmptyState::NoMatches => "No registrants found matching your search.",
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
