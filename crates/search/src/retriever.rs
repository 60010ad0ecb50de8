//! Candidate retrieval
//!
//! Pipeline for one query:
//! 1. Look up the posting list of every query token
//! 2. Combine them (union for `MatchMode::Any`, intersection for `All`)
//! 3. Keep ids filed under one of the resolved scopes
//! 4. Keep ids filed under the requested type, if any
//! 5. Resolve ids to stored documents, skipping orphans
//! 6. Apply metadata filters
//!
//! Zero query tokens means zero candidates. There is no match-everything
//! fallback; listings without text go through `list_partitioned`.

use crate::index::PostingList;
use crate::indexer::{IndexState, IndexedDocument};
use rustc_hash::FxHashSet;
use sphere_core::{MatchMode, SearchFilters, TypeFilter};
use tracing::warn;

/// Candidates for a query, plus how many ids survived partition narrowing
#[derive(Debug)]
pub struct Candidates<'a> {
    /// Documents that passed every filter, ordered by id
    pub documents: Vec<&'a IndexedDocument>,
    /// Ids considered after scope/type narrowing, before metadata filters
    pub considered: usize,
}

/// Collect the candidate documents for a tokenized query
pub fn retrieve<'a>(
    state: &'a IndexState,
    query_tokens: &[String],
    match_mode: MatchMode,
    scopes: &[String],
    doc_type: TypeFilter,
    filters: &SearchFilters,
) -> Candidates<'a> {
    if query_tokens.is_empty() || scopes.is_empty() {
        return Candidates {
            documents: vec![],
            considered: 0,
        };
    }

    let lists: Vec<Option<&PostingList>> = query_tokens
        .iter()
        .map(|t| state.inverted().lookup(t))
        .collect();
    let matched = match match_mode {
        MatchMode::Any => union(lists.iter().flatten().copied()),
        MatchMode::All => intersection(&lists),
    };

    let narrowed: Vec<&str> = matched
        .into_iter()
        .filter(|id| in_scopes(state, scopes, id))
        .filter(|id| in_type(state, doc_type, id))
        .collect();
    let considered = narrowed.len();

    let mut documents = resolve(state, narrowed);
    documents.retain(|doc| passes_filters(doc, filters));

    Candidates {
        documents,
        considered,
    }
}

/// Documents filed under the given scope and/or type, without a text query
///
/// `None` for a dimension means "no restriction on it".
pub fn list_partitioned<'a>(
    state: &'a IndexState,
    scope: Option<&str>,
    doc_type: TypeFilter,
) -> Vec<&'a IndexedDocument> {
    let ids: Vec<&str> = match (scope, doc_type) {
        (Some(scope), _) => match state.scopes().get(&scope.to_string()) {
            Some(list) => list.iter().filter(|id| in_type(state, doc_type, id)).collect(),
            None => vec![],
        },
        (None, Some(t)) => match state.types().get(&t) {
            Some(list) => list.iter().collect(),
            None => vec![],
        },
        (None, None) => state.documents().map(|d| d.document().id.as_str()).collect(),
    };
    resolve(state, ids)
}

fn union<'a>(lists: impl Iterator<Item = &'a PostingList>) -> FxHashSet<&'a str> {
    let mut ids = FxHashSet::default();
    for list in lists {
        ids.extend(list.iter());
    }
    ids
}

fn intersection<'a>(lists: &[Option<&'a PostingList>]) -> FxHashSet<&'a str> {
    // A token with no postings empties the intersection
    let Some(present) = lists.iter().copied().collect::<Option<Vec<_>>>() else {
        return FxHashSet::default();
    };
    let Some(smallest) = present.iter().copied().min_by_key(|l| l.len()) else {
        return FxHashSet::default();
    };
    smallest
        .iter()
        .filter(|id| present.iter().all(|l| l.contains(id)))
        .collect()
}

fn in_scopes(state: &IndexState, scopes: &[String], id: &str) -> bool {
    scopes.iter().any(|s| state.scopes().contains(s, id))
}

fn in_type(state: &IndexState, doc_type: TypeFilter, id: &str) -> bool {
    match doc_type {
        Some(t) => state.types().contains(&t, id),
        None => true,
    }
}

/// Map ids to stored documents, dropping orphans, ordered by id
fn resolve<'a>(state: &'a IndexState, ids: Vec<&str>) -> Vec<&'a IndexedDocument> {
    let mut documents: Vec<&IndexedDocument> = ids
        .into_iter()
        .filter_map(|id| match state.get(id) {
            Some(doc) => Some(doc),
            None => {
                warn!(
                    target: "sphere::search",
                    id = id,
                    version = state.version(),
                    "Index references a document missing from the store; skipping"
                );
                None
            }
        })
        .collect();
    documents.sort_by(|a, b| a.document().id.cmp(&b.document().id));
    documents
}

/// Whether a document satisfies every filter present in `filters`
pub fn passes_filters(doc: &IndexedDocument, filters: &SearchFilters) -> bool {
    let d = doc.document();
    if let Some(range) = &filters.date_range {
        if !range.contains(d.created_at) {
            return false;
        }
    }
    if let Some(owner) = &filters.owner_id {
        if d.owner_id() != Some(owner.as_str()) {
            return false;
        }
    }
    if let Some(status) = &filters.status {
        if d.status() != Some(status.as_str()) {
            return false;
        }
    }
    if !filters.tags.is_empty() {
        let tags = d.tags();
        if !filters.tags.iter().any(|t| tags.contains(&t.as_str())) {
            return false;
        }
    }
    true
}
