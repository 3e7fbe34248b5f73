//! Ordering of the candidate set.

use std::cmp::Reverse;

use crate::domain::Post;

use super::search::SearchTerm;

const TITLE_WEIGHT: u8 = 2;
const CONTENT_WEIGHT: u8 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Newest first.
    #[default]
    Latest,
    /// Best search match first, newest first among equals.
    Relevance,
}

impl SortMode {
    /// Parse the `SortBy` parameter. Anything unrecognized sorts by recency.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("relevance") => SortMode::Relevance,
            _ => SortMode::Latest,
        }
    }
}

/// Presence-based score: a title hit is worth 2, a content hit 1.
pub fn relevance_score(post: &Post, term: &SearchTerm) -> u8 {
    let mut score = 0;
    if term.in_title(post) {
        score += TITLE_WEIGHT;
    }
    if term.in_content(post) {
        score += CONTENT_WEIGHT;
    }
    score
}

/// Order posts for display. The order is total: equal timestamps fall back to
/// the post id, so the same data always yields the same sequence.
pub fn rank(mut posts: Vec<Post>, mode: SortMode, term: Option<&SearchTerm>) -> Vec<Post> {
    match (mode, term) {
        (SortMode::Relevance, Some(term)) => posts.sort_by_cached_key(|p| {
            (
                Reverse(relevance_score(p, term)),
                Reverse(p.created_at),
                Reverse(p.id),
            )
        }),
        _ => posts.sort_by_key(|p| (Reverse(p.created_at), Reverse(p.id))),
    }
    posts
}
