//! Result building
//!
//! Everything that happens after scoring:
//! - ranking (sort key, direction, deterministic tie-breaks)
//! - the minimum-relevance cut (relevance sort only)
//! - facets over the full ranked set
//! - pagination
//! - snippets
//! - prefix suggestions for empty pages

use crate::indexer::{IndexState, IndexedDocument};
use sphere_core::{Facets, SearchResult, SortBy, SortOrder};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Appended to a snippet when content was cut
pub const ELLIPSIS: &str = "...";

/// A candidate paired with its score
#[derive(Debug, Clone, Copy)]
pub struct Scored<'a> {
    /// The candidate
    pub doc: &'a IndexedDocument,
    /// Its relevance score
    pub score: f32,
}

/// Sort candidates in place
///
/// The primary key follows `sort_by` and `order`. Ties always resolve the
/// same way so that paging through a fixed index never repeats or skips a
/// result: newer `updated_at` first for relevance, then id ascending.
pub fn rank(scored: &mut [Scored<'_>], sort_by: SortBy, order: SortOrder) {
    scored.sort_by(|a, b| compare(a, b, sort_by, order));
}

fn compare(a: &Scored<'_>, b: &Scored<'_>, sort_by: SortBy, order: SortOrder) -> Ordering {
    let (da, db) = (a.doc.document(), b.doc.document());
    let primary = match sort_by {
        SortBy::Relevance => a.score.total_cmp(&b.score),
        SortBy::Date => da.updated_at.cmp(&db.updated_at),
        SortBy::Title => da.title.cmp(&db.title),
    };
    let primary = match order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary
        .then_with(|| match sort_by {
            SortBy::Relevance => db.updated_at.cmp(&da.updated_at),
            _ => Ordering::Equal,
        })
        .then_with(|| da.id.cmp(&db.id))
}

/// Drop candidates scoring below `min_relevance`
///
/// Only meaningful for relevance-sorted queries; callers skip it otherwise.
pub fn apply_threshold(scored: &mut Vec<Scored<'_>>, min_relevance: f32) {
    scored.retain(|s| s.score >= min_relevance);
}

/// Facet counts over every candidate, before pagination
pub fn facets(scored: &[Scored<'_>]) -> Facets {
    let mut facets = Facets::default();
    for s in scored {
        facets.record(s.doc.document());
    }
    facets
}

/// The `[offset, offset + limit)` window of a ranked list
pub fn paginate<'s, 'a>(scored: &'s [Scored<'a>], offset: usize, limit: usize) -> &'s [Scored<'a>] {
    let start = offset.min(scored.len());
    let end = start.saturating_add(limit).min(scored.len());
    &scored[start..end]
}

/// Leading `max_chars` characters of `content`
///
/// Counted in characters, not bytes. The ellipsis is added only when
/// something was cut.
pub fn snippet(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &content[..cut], ELLIPSIS),
        None => content.to_string(),
    }
}

/// Convert a page of candidates into results
pub fn to_results(page: &[Scored<'_>], snippet_length: Option<usize>) -> Vec<SearchResult> {
    page.iter()
        .map(|s| {
            let doc = s.doc.document();
            let snip = snippet_length.map(|n| snippet(&doc.content, n));
            SearchResult::from_document(doc, s.score, snip)
        })
        .collect()
}

/// Index tokens extending one of the query tokens
///
/// A suggestion must be strictly longer than the query token it extends
/// and must have at least one posting inside `scopes`, so suggestions
/// never reveal vocabulary from scopes the query could not search.
/// Sorted, deduplicated, at most `max` entries.
pub fn suggestions(
    state: &IndexState,
    query_tokens: &[String],
    scopes: &[String],
    max: usize,
) -> Vec<String> {
    let mut found = BTreeSet::new();
    for prefix in query_tokens {
        for (token, list) in state.inverted().tokens_with_prefix(prefix) {
            if token == prefix {
                continue;
            }
            let visible = list
                .iter()
                .any(|id| scopes.iter().any(|s| state.scopes().contains(s, id)));
            if visible {
                found.insert(token.to_string());
            }
        }
    }
    found.into_iter().take(max).collect()
}
