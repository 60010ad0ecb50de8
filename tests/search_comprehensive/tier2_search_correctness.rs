//! Tier 2: Search Correctness
//!
//! Scope isolation, candidate semantics, filters, and validation.

use crate::test_utils::*;
use sphere::{
    parse_type_filter, tokenize, DateRange, DocumentType, Error, MatchMode, ScopeMode,
    ScopeSelection, SearchEngine, SearchFilters, SearchQuery, SortBy,
};

// ============================================================================
// Scope isolation
// ============================================================================

/// d3 lives in quebec-city and must never surface for a caller limited to mtl
#[test]
fn test_tier2_scope_isolation_every_mode() {
    let engine = renovation_engine();
    let selections = [
        ScopeSelection::current("mtl"),
        ScopeSelection::current("quebec-city"),
        ScopeSelection::specified(["quebec-city"]),
        ScopeSelection::specified(["mtl", "quebec-city"]),
        ScopeSelection::all_accessible(),
    ];
    for selection in selections {
        let query = SearchQuery::new("renovation").with_scope(selection.clone());
        let response = run(&engine, &query, &["mtl"]);
        assert!(
            !response.ids().contains(&"d3"),
            "d3 leaked through {:?}",
            selection
        );
        assert_all_in_scopes(&response, &["mtl"]);
    }
}

#[test]
fn test_tier2_inaccessible_current_scope_is_empty() {
    let engine = renovation_engine();
    let query =
        SearchQuery::new("renovation").with_scope(ScopeSelection::current("quebec-city"));
    let response = run(&engine, &query, &["mtl"]);
    assert!(response.is_empty());
    assert_eq!(response.total_count, 0);
    assert!(response.scope_info.searched_scopes.is_empty());
}

#[test]
fn test_tier2_no_accessible_scopes_is_empty() {
    let engine = renovation_engine();
    let query = SearchQuery::new("renovation").with_scope(ScopeSelection::all_accessible());
    assert!(run(&engine, &query, &[]).is_empty());
}

#[test]
fn test_tier2_specified_spheres_narrowing() {
    let engine = renovation_engine();
    let query = SearchQuery::new("renovation")
        .with_scope(ScopeSelection::specified(["mtl", "quebec-city", "nowhere"]));
    let response = run(&engine, &query, &["mtl", "quebec-city"]);
    assert_eq!(response.total_count, 3);
    assert_eq!(
        response.scope_info.searched_scopes,
        scopes(&["mtl", "quebec-city"])
    );
    assert_eq!(response.scope_info.mode, ScopeMode::SpecifiedSpheres);
}

#[test]
fn test_tier2_global_ignores_accessible() {
    let engine = renovation_engine();
    let query = SearchQuery::new("renovation").with_scope(ScopeSelection::global());
    let response = run(&engine, &query, &[]);
    assert_eq!(response.total_count, 3);
}

// ============================================================================
// Candidate semantics
// ============================================================================

#[test]
fn test_tier2_query_and_document_tokenize_identically() {
    let engine = SearchEngine::new();
    engine
        .index_document(note("d1", "mtl", "Q3-Roadmap", "e-mail follow_up"))
        .unwrap();

    for text in ["q3 roadmap", "ROADMAP!!", "follow_up", "mail"] {
        let hits = engine.quick_search(text, "mtl", 10).unwrap();
        assert_eq!(hits.len(), 1, "query {:?} tokens {:?}", text, tokenize(text));
    }
    // "q3" alone is too short to be a token
    assert!(engine.quick_search("q3", "mtl", 10).unwrap().is_empty());
}

#[test]
fn test_tier2_empty_query_yields_nothing() {
    let engine = renovation_engine();
    for text in ["", "   ", "a an of", "!!!"] {
        let hits = engine.quick_search(text, "mtl", 10).unwrap();
        assert!(hits.is_empty(), "query {:?} matched", text);
    }
}

#[test]
fn test_tier2_union_is_default() {
    let engine = workspace_engine();
    let query = SearchQuery::new("cabinets tiles").with_scope(ScopeSelection::current("mtl"));
    let mut ids: Vec<String> = run(&engine, &query, &["mtl"])
        .ids()
        .into_iter()
        .map(str::to_string)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["t1", "t2"]);
}

#[test]
fn test_tier2_intersection_mode() {
    let engine = workspace_engine();
    let query = SearchQuery::new("renovation bathroom")
        .with_scope(ScopeSelection::current("mtl"))
        .with_match_mode(MatchMode::All);
    assert_eq!(run(&engine, &query, &["mtl"]).ids(), vec!["t2"]);
}

#[test]
fn test_tier2_type_filter() {
    let engine = workspace_engine();
    let query = SearchQuery::new("renovation")
        .with_scope(ScopeSelection::current("mtl"))
        .with_type(DocumentType::Meeting);
    assert_eq!(run(&engine, &query, &["mtl"]).ids(), vec!["m1"]);

    assert_eq!(parse_type_filter("all").unwrap(), None);
    assert_eq!(
        parse_type_filter("Task").unwrap(),
        Some(DocumentType::Task)
    );
    assert!(matches!(
        parse_type_filter("spreadsheet"),
        Err(Error::UnknownDocumentType(_))
    ));
}

// ============================================================================
// Metadata filters
// ============================================================================

fn filtered(filters: SearchFilters) -> Vec<String> {
    let engine = workspace_engine();
    let query = SearchQuery::new("renovation")
        .with_scope(ScopeSelection::current("mtl"))
        .with_sort(SortBy::Date)
        .with_filters(filters);
    let mut ids: Vec<String> = run(&engine, &query, &["mtl"])
        .ids()
        .into_iter()
        .map(str::to_string)
        .collect();
    ids.sort();
    ids
}

#[test]
fn test_tier2_absent_filters_not_applied() {
    assert_eq!(filtered(SearchFilters::default()), vec!["m1", "n1", "t1", "t2"]);
}

#[test]
fn test_tier2_owner_filter() {
    let filters = SearchFilters {
        owner_id: Some("ana".into()),
        ..Default::default()
    };
    assert_eq!(filtered(filters), vec!["m1", "t1"]);
}

#[test]
fn test_tier2_status_filter() {
    let filters = SearchFilters {
        status: Some("done".into()),
        ..Default::default()
    };
    assert_eq!(filtered(filters), vec!["t2"]);
}

#[test]
fn test_tier2_tag_overlap_filter() {
    let filters = SearchFilters {
        tags: vec!["bathroom".into(), "garden".into()],
        ..Default::default()
    };
    assert_eq!(filtered(filters), vec!["t2"]);
}

#[test]
fn test_tier2_date_range_inclusive() {
    let filters = SearchFilters {
        date_range: Some(DateRange::between(day(20), day(40))),
        ..Default::default()
    };
    assert_eq!(filtered(filters), vec!["m1", "t2"]);

    let open_ended = SearchFilters {
        date_range: Some(DateRange {
            start: Some(day(40)),
            end: None,
        }),
        ..Default::default()
    };
    assert_eq!(filtered(open_ended), vec!["n1", "t2"]);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_tier2_inverted_date_range_rejected() {
    let engine = workspace_engine();
    let query = SearchQuery::new("renovation").with_filters(SearchFilters {
        date_range: Some(DateRange::between(day(10), day(5))),
        ..Default::default()
    });
    let err = engine.search(&query, &scopes(&["mtl"])).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.is_caller_error());
}

#[test]
fn test_tier2_bad_limits_rejected() {
    let engine = workspace_engine();
    let acc = scopes(&["mtl"]);
    for limit in [0, 1001] {
        let query = SearchQuery::new("renovation").with_limit(limit);
        assert!(matches!(
            engine.search(&query, &acc),
            Err(Error::Validation(_))
        ));
    }
    assert!(engine.quick_search("renovation", "mtl", 0).is_err());
    assert!(engine.find_similar("t1", 0).is_err());
}

#[test]
fn test_tier2_negative_relevance_rejected() {
    let engine = workspace_engine();
    let query = SearchQuery::new("renovation").with_filters(SearchFilters {
        min_relevance: Some(-0.5),
        ..Default::default()
    });
    assert!(engine.search(&query, &scopes(&["mtl"])).is_err());
}

#[test]
fn test_tier2_zero_results_is_success() {
    let engine = workspace_engine();
    let query = SearchQuery::new("zeppelin").with_scope(ScopeSelection::current("mtl"));
    let response = run(&engine, &query, &["mtl"]);
    assert!(response.is_empty());
    assert_eq!(response.returned_count, 0);
    assert!(response.facets.is_empty());
}
