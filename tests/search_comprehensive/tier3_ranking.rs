//! Tier 3: Ranking & Pagination
//!
//! Scoring weights, sort orders, facets and page boundaries.

use crate::test_utils::*;
use sphere::{
    DocumentType, ScopeSelection, SearchEngine, SearchFilters, SearchQuery, SortBy, SortOrder,
    Timestamp,
};

// ============================================================================
// Scoring
// ============================================================================

/// Title match outranks a repeated body match
#[test]
fn test_tier3_title_beats_repetition() {
    let engine = renovation_engine();
    let query = SearchQuery::new("renovation").with_scope(ScopeSelection::current("mtl"));
    let response = run(&engine, &query, &["mtl"]);

    assert_eq!(response.ids(), vec!["d1", "d2"]);
    assert!((response.results[0].score - 1.0).abs() < 1e-6);
    assert!((response.results[1].score - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_tier3_title_match_strictly_higher() {
    let engine = SearchEngine::new();
    engine
        .index_documents([
            note("with", "mtl", "budget review", "quarterly numbers"),
            note("without", "mtl", "review", "quarterly numbers budget"),
        ])
        .unwrap();
    let results = engine.quick_search("budget", "mtl", 10).unwrap();
    assert_eq!(results[0].id, "with");
    assert!(results[0].score > results[1].score);
}

#[test]
fn test_tier3_recency_boost() {
    let engine = SearchEngine::new();
    let now = Timestamp::now();
    engine
        .index_documents([
            note("old", "mtl", "Notes", "renovation"),
            sphere::Document::new("fresh", DocumentType::Note, "mtl", "Notes", "renovation")
                .with_timestamps(now, now),
        ])
        .unwrap();
    let results = engine.quick_search("renovation", "mtl", 10).unwrap();
    assert_eq!(results[0].id, "fresh");
    assert!((results[0].score - 1.2 / 3.0).abs() < 1e-6);
    assert!((results[1].score - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_tier3_min_relevance_override() {
    let engine = renovation_engine();
    let query = SearchQuery::new("renovation")
        .with_scope(ScopeSelection::current("mtl"))
        .with_filters(SearchFilters {
            min_relevance: Some(0.5),
            ..Default::default()
        });
    assert_eq!(run(&engine, &query, &["mtl"]).ids(), vec!["d1"]);
}

#[test]
fn test_tier3_default_threshold_drops_weak_matches() {
    let engine = SearchEngine::new();
    engine
        .index_document(note("d1", "mtl", "unrelated", "alpha"))
        .unwrap();
    // 1 of 12 possible points: below the default 0.1 cut
    let query = SearchQuery::new("alpha bravo charlie delta")
        .with_scope(ScopeSelection::current("mtl"));
    let response = run(&engine, &query, &["mtl"]);
    assert!(response.is_empty());

    let by_title = query.with_sort(SortBy::Title);
    assert_eq!(run(&engine, &by_title, &["mtl"]).ids(), vec!["d1"]);
}

// ============================================================================
// Sort orders
// ============================================================================

fn sorted(sort_by: SortBy, order: SortOrder) -> Vec<String> {
    let engine = workspace_engine();
    let query = SearchQuery::new("renovation")
        .with_scope(ScopeSelection::current("mtl"))
        .with_sort(sort_by)
        .with_order(order);
    run(&engine, &query, &["mtl"])
        .ids()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_tier3_sort_by_date() {
    assert_eq!(sorted(SortBy::Date, SortOrder::Desc), vec!["n1", "t2", "m1", "t1"]);
    assert_eq!(sorted(SortBy::Date, SortOrder::Asc), vec!["t1", "m1", "t2", "n1"]);
}

#[test]
fn test_tier3_sort_by_title() {
    // Bathroom tiles, Budget note, Contractor sync, Kitchen renovation
    assert_eq!(
        sorted(SortBy::Title, SortOrder::Asc),
        vec!["t2", "n1", "m1", "t1"]
    );
}

#[test]
fn test_tier3_relevance_ties_are_deterministic() {
    let engine = SearchEngine::new();
    engine
        .index_documents([
            doc_at("b", DocumentType::Note, "mtl", "same", "renovation", 5),
            doc_at("a", DocumentType::Note, "mtl", "same", "renovation", 5),
            doc_at("c", DocumentType::Note, "mtl", "same", "renovation", 9),
        ])
        .unwrap();
    let ids: Vec<String> = engine
        .quick_search("renovation", "mtl", 10)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    // Equal scores: newest first, then id
    assert_eq!(ids, vec!["c", "a", "b"]);
}

// ============================================================================
// Pagination
// ============================================================================

fn paged_engine() -> SearchEngine {
    let engine = SearchEngine::new();
    let docs = (0..9).map(|i| {
        let title = if i % 3 == 0 { "renovation" } else { "misc" };
        doc_at(
            &format!("p{}", i),
            DocumentType::Note,
            "mtl",
            title,
            "renovation details",
            i,
        )
    });
    engine.index_documents(docs).unwrap();
    engine
}

#[test]
fn test_tier3_pages_are_disjoint_and_contiguous() {
    let engine = paged_engine();
    let page = |offset: usize, limit: usize| -> Vec<String> {
        let query = SearchQuery::new("renovation")
            .with_scope(ScopeSelection::current("mtl"))
            .with_offset(offset)
            .with_limit(limit);
        run(&engine, &query, &["mtl"])
            .ids()
            .into_iter()
            .map(str::to_string)
            .collect()
    };

    let first = page(0, 2);
    let second = page(2, 2);
    let both = page(0, 4);

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert!(first.iter().all(|id| !second.contains(id)));
    assert_eq!([first, second].concat(), both);
}

#[test]
fn test_tier3_total_count_ignores_pagination() {
    let engine = paged_engine();
    let query = SearchQuery::new("renovation")
        .with_scope(ScopeSelection::current("mtl"))
        .with_offset(8)
        .with_limit(5);
    let response = run(&engine, &query, &["mtl"]);
    assert_eq!(response.total_count, 9);
    assert_eq!(response.returned_count, 1);

    let past_end = SearchQuery::new("renovation")
        .with_scope(ScopeSelection::current("mtl"))
        .with_offset(50);
    let response = run(&engine, &past_end, &["mtl"]);
    assert!(response.is_empty());
    assert_eq!(response.total_count, 9);
}

#[test]
fn test_tier3_default_limit() {
    let engine = SearchEngine::new();
    let docs = (0..30).map(|i| note(&format!("n{}", i), "mtl", "renovation", ""));
    engine.index_documents(docs).unwrap();
    let query = SearchQuery::new("renovation").with_scope(ScopeSelection::current("mtl"));
    let response = run(&engine, &query, &["mtl"]);
    assert_eq!(response.returned_count, 20);
    assert_eq!(response.total_count, 30);
}

// ============================================================================
// Facets and snippets
// ============================================================================

#[test]
fn test_tier3_facets_cover_full_set() {
    let engine = workspace_engine();
    let query = SearchQuery::new("renovation")
        .with_scope(ScopeSelection::all_accessible())
        .with_limit(1);
    let response = run(&engine, &query, &["mtl", "qc"]);

    assert_eq!(response.returned_count, 1);
    assert_eq!(response.total_count, 5);

    let facets = &response.facets;
    assert_eq!(facets.by_type[&DocumentType::Task], 2);
    assert_eq!(facets.by_type[&DocumentType::Meeting], 1);
    assert_eq!(facets.by_scope["mtl"], 4);
    assert_eq!(facets.by_scope["qc"], 1);
    // Days 1, 10, 20 fall in January 2020; 40 in February; 70 in March
    assert_eq!(facets.by_month["2020-01"], 3);
    assert_eq!(facets.by_month["2020-02"], 1);
    assert_eq!(facets.by_month["2020-03"], 1);
}

#[test]
fn test_tier3_snippets_on_request() {
    let engine = SearchEngine::new();
    let long = "renovation ".repeat(30);
    engine
        .index_documents([
            note("long", "mtl", "Long", &long),
            note("short", "mtl", "Short", "renovation"),
        ])
        .unwrap();

    let plain = SearchQuery::new("renovation").with_scope(ScopeSelection::current("mtl"));
    let response = run(&engine, &plain, &["mtl"]);
    assert!(response.results.iter().all(|r| r.snippet.is_none()));

    let with = plain.with_snippets();
    let response = run(&engine, &with, &["mtl"]);
    for result in &response.results {
        let snippet = result.snippet.as_deref().unwrap();
        match result.id.as_str() {
            "long" => {
                assert_eq!(snippet.chars().count(), 153);
                assert!(snippet.ends_with("..."));
            }
            _ => assert_eq!(snippet, "renovation"),
        }
    }
}

#[test]
fn test_tier3_suggestions_for_partial_word() {
    let engine = renovation_engine();
    let query = SearchQuery::new("renov").with_scope(ScopeSelection::current("mtl"));
    let response = run(&engine, &query, &["mtl"]);
    assert!(response.is_empty());
    let suggestions = response.suggestions.unwrap();
    assert!(suggestions.contains(&"renovation".to_string()));
    assert!(suggestions.len() <= 5);
}

#[test]
fn test_tier3_no_suggestions_when_results_present() {
    let engine = renovation_engine();
    let query = SearchQuery::new("renovation").with_scope(ScopeSelection::current("mtl"));
    assert!(run(&engine, &query, &["mtl"]).suggestions.is_none());
}
