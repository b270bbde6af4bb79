//! # rtfm-matcher
//!
//! Fuzzy subsequence ranking over inventory entries.
//!
//! A query matches a key when its characters appear in order, ignoring case.
//! Matches are ranked by the length of the matched span, then by where the
//! span starts, so `bot` puts `Bot` ahead of `commands.ExtensionBot`.

pub mod rank;
pub mod subsequence;

pub use rank::{rank, MatchCandidate};
pub use subsequence::{find_match, FuzzyMatcher, SubsequenceMatch};
