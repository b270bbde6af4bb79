//! Case-insensitive subsequence search.
//!
//! Mirrors the lazy pattern `q0.*?q1.*?q2...`: the match starts at the
//! leftmost position from which the whole query can be found in order, and
//! each following query character is taken at its earliest position. That
//! leftmost start is always the first occurrence of the first query
//! character, so a single forward scan is enough.

/// Location of a subsequence match, measured in characters.
///
/// Ordering is by span length, then start offset: the ranking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubsequenceMatch {
    /// Characters from the first to the last matched character, inclusive
    pub span: usize,
    /// Character offset of the first matched character
    pub start: usize,
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// A query prepared for repeated matching.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    needle: Vec<char>,
}

impl FuzzyMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.chars().map(fold).collect(),
        }
    }

    /// True for an empty query, which matches everything at offset 0.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Find the query in `text`.
    pub fn find(&self, text: &str) -> Option<SubsequenceMatch> {
        let Some((&first, rest)) = self.needle.split_first() else {
            return Some(SubsequenceMatch { span: 0, start: 0 });
        };

        let mut chars = text.chars().map(fold).enumerate();
        let (start, _) = chars.by_ref().find(|&(_, c)| c == first)?;

        let mut end = start;
        for &want in rest {
            let (idx, _) = chars.by_ref().find(|&(_, c)| c == want)?;
            end = idx;
        }

        Some(SubsequenceMatch {
            span: end - start + 1,
            start,
        })
    }
}

/// One-shot form of [`FuzzyMatcher::find`].
pub fn find_match(query: &str, text: &str) -> Option<SubsequenceMatch> {
    FuzzyMatcher::new(query).find(text)
}
