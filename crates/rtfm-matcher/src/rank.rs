//! Ranking of inventory entries against a query.

use rtfm_types::InventoryEntry;

use crate::subsequence::{FuzzyMatcher, SubsequenceMatch};

/// A matched entry with its score. Only lives for one ranking call.
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidate<'a> {
    pub entry: &'a InventoryEntry,
    pub match_length: usize,
    pub match_start: usize,
}

impl<'a> MatchCandidate<'a> {
    fn new(entry: &'a InventoryEntry, found: SubsequenceMatch) -> Self {
        Self {
            entry,
            match_length: found.span,
            match_start: found.start,
        }
    }

    fn score(&self) -> (usize, usize) {
        (self.match_length, self.match_start)
    }
}

/// Rank `candidates` by how tightly their keys contain `query`.
///
/// Entries whose key does not contain the query as a subsequence are
/// dropped. The rest are ordered by `(span, start)` with a stable sort, so
/// full ties keep their input order, and the first `limit` are returned.
pub fn rank<'a>(
    query: &str,
    candidates: &'a [InventoryEntry],
    limit: usize,
) -> Vec<&'a InventoryEntry> {
    let matcher = FuzzyMatcher::new(query);

    let mut matched: Vec<MatchCandidate<'a>> = candidates
        .iter()
        .filter_map(|entry| {
            matcher
                .find(&entry.key)
                .map(|found| MatchCandidate::new(entry, found))
        })
        .collect();

    matched.sort_by_key(MatchCandidate::score);

    matched
        .into_iter()
        .take(limit)
        .map(|candidate| candidate.entry)
        .collect()
}
