//! The search engine facade
//!
//! `SearchEngine` owns the index state behind a single `RwLock`:
//! - writers (`index_document`, `update_index`, `remove_from_index`, ...)
//!   take the write guard for the whole mutation, so an update's
//!   remove-then-insert is one step to every reader
//! - readers take the read guard for the whole query pipeline, so a query
//!   sees one consistent snapshot from scope resolution to suggestions
//!
//! Internal helpers take `&IndexState` rather than `&self` locking again,
//! so no code path re-enters the lock.

use crate::expand::{expand_tokens, StaticSynonyms, SynonymProvider};
use crate::indexer::{ConsistencyReport, IndexState};
use crate::results::{self, Scored};
use crate::retriever::{list_partitioned, retrieve};
use crate::scope::resolve_scopes;
use crate::scorer::{KeywordScorer, Scorer, ScorerContext};
use crate::tokenizer::tokenize;
use parking_lot::RwLock;
use sphere_core::{
    Document, EngineConfig, Error, IndexStats, MatchMode, Result, ScopeInfo, ScopeMode,
    ScopeSelection, SearchFilters, SearchQuery, SearchResponse, SearchResult, SearchStats, SortBy,
    SortOrder, TypeFilter,
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Options for `semantic_search`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticOptions {
    /// Type restriction (`None` = all types)
    pub doc_type: TypeFilter,
    /// Page size (engine default when absent)
    pub limit: Option<usize>,
    /// Attach content snippets
    pub include_snippets: bool,
    /// Relevance cut (configured minimum when absent)
    pub min_relevance: Option<f32>,
}

/// Fully resolved parameters of one pipeline run
struct Plan<'q> {
    tokens: Vec<String>,
    scopes: Vec<String>,
    mode: ScopeMode,
    doc_type: TypeFilter,
    filters: &'q SearchFilters,
    match_mode: MatchMode,
    sort_by: SortBy,
    order: SortOrder,
    offset: usize,
    limit: usize,
    snippets: bool,
    min_relevance: f32,
}

// ============================================================================
// SearchEngine
// ============================================================================

/// Scoped in-memory document index
///
/// Thread-safe: share it behind an `Arc` and call it from any thread.
///
/// # Example
///
/// ```
/// use sphere_core::{Document, DocumentType, ScopeSelection, SearchQuery};
/// use sphere_search::SearchEngine;
///
/// let engine = SearchEngine::new();
/// engine
///     .index_document(Document::new(
///         "d1",
///         DocumentType::Note,
///         "mtl",
///         "Renovation budget",
///         "discussing costs",
///     ))
///     .unwrap();
///
/// let query = SearchQuery::new("renovation").with_scope(ScopeSelection::current("mtl"));
/// let response = engine.search(&query, &["mtl".to_string()]).unwrap();
/// assert_eq!(response.ids(), vec!["d1"]);
/// ```
pub struct SearchEngine {
    state: RwLock<IndexState>,
    config: EngineConfig,
    scorer: Arc<dyn Scorer>,
    synonyms: Arc<dyn SynonymProvider>,
}

impl SearchEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        SearchEngine {
            state: RwLock::new(IndexState::new()),
            config: EngineConfig::default(),
            scorer: Arc::new(KeywordScorer),
            synonyms: Arc::new(StaticSynonyms),
        }
    }

    /// Create an engine with a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(SearchEngine {
            config,
            ..SearchEngine::new()
        })
    }

    /// Builder: replace the scorer
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Builder: replace the synonym table used by `semantic_search`
    pub fn with_synonyms(mut self, synonyms: Arc<dyn SynonymProvider>) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Indexing
    // ========================================================================

    /// Index a document; an existing id is replaced as by `update_index`
    pub fn index_document(&self, document: Document) -> Result<()> {
        let id = document.id.clone();
        let mut state = self.state.write();
        let tokens = state.insert(document)?;
        debug!(
            target: "sphere::search",
            id = %id,
            tokens,
            version = state.version(),
            "Indexed document"
        );
        Ok(())
    }

    /// Index many documents under one write guard
    ///
    /// Every document is validated first; if any is invalid nothing is
    /// indexed. Returns the number of distinct ids indexed; a repeated id
    /// keeps its last copy.
    pub fn index_documents<I>(&self, documents: I) -> Result<usize>
    where
        I: IntoIterator<Item = Document>,
    {
        let documents: Vec<Document> = documents.into_iter().collect();
        let mut state = self.state.write();
        let count = state.insert_all(documents)?;
        debug!(
            target: "sphere::search",
            count,
            version = state.version(),
            "Indexed document batch"
        );
        Ok(count)
    }

    /// Replace a document: remove-then-insert as one step
    pub fn update_index(&self, document: Document) -> Result<()> {
        let id = document.id.clone();
        let mut state = self.state.write();
        let tokens = state.insert(document)?;
        debug!(
            target: "sphere::search",
            id = %id,
            tokens,
            version = state.version(),
            "Updated document"
        );
        Ok(())
    }

    /// Remove a document; returns false (not an error) for an unknown id
    pub fn remove_from_index(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let removed = state.remove(id).is_some();
        if removed {
            debug!(
                target: "sphere::search",
                id = %id,
                version = state.version(),
                "Removed document"
            );
        }
        removed
    }

    /// Drop every document
    pub fn clear(&self) {
        let mut state = self.state.write();
        let dropped = state.len();
        state.clear();
        info!(target: "sphere::search", dropped, "Cleared index");
    }

    /// Drop empty sets and release spare capacity; returns sets dropped
    pub fn compact(&self) -> usize {
        let mut state = self.state.write();
        let dropped = state.compact();
        info!(
            target: "sphere::search",
            dropped,
            documents = state.len(),
            "Compacted index"
        );
        dropped
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// A copy of the stored document
    pub fn get_document(&self, id: &str) -> Option<Document> {
        self.state.read().get(id).map(|d| d.document().clone())
    }

    /// Tokens derived for a stored document
    pub fn document_tokens(&self, id: &str) -> Option<Vec<String>> {
        self.state.read().get(id).map(|d| d.tokens().to_vec())
    }

    /// Whether an id is indexed
    pub fn contains(&self, id: &str) -> bool {
        self.state.read().contains(id)
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    /// Mutation counter
    pub fn version(&self) -> u64 {
        self.state.read().version()
    }

    /// Whole-index counters
    pub fn get_stats(&self) -> IndexStats {
        self.state.read().stats()
    }

    /// Cross-check the store against every index structure
    pub fn check_consistency(&self) -> ConsistencyReport {
        let report = self.state.read().check_consistency();
        if !report.is_consistent() {
            warn!(
                target: "sphere::search",
                orphan_postings = report.orphan_postings.len(),
                orphan_scope_entries = report.orphan_scope_entries.len(),
                orphan_type_entries = report.orphan_type_entries.len(),
                missing_postings = report.missing_postings.len(),
                missing_partition_entries = report.missing_partition_entries.len(),
                "Index consistency check failed"
            );
        }
        report
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Scoped search
    ///
    /// `accessible` is the caller's accessible scope list, computed by the
    /// permission layer. `Global` mode ignores it.
    ///
    /// # Errors
    ///
    /// `Error::Validation` for a malformed filter or an out-of-range limit.
    pub fn search(&self, query: &SearchQuery, accessible: &[String]) -> Result<SearchResponse> {
        query.filters.validate()?;
        let limit = self.check_limit(query.limit)?;
        let tokens = tokenize(&query.text);

        let state = self.state.read();
        let scopes = resolve_scopes(&query.scope, accessible, state.scopes().keys());
        let plan = Plan {
            tokens,
            scopes,
            mode: query.scope.mode,
            doc_type: query.doc_type,
            filters: &query.filters,
            match_mode: query.match_mode.unwrap_or(self.config.match_mode),
            sort_by: query.sort_by,
            order: query.order,
            offset: query.offset,
            limit,
            snippets: query.include_snippets,
            min_relevance: query
                .filters
                .min_relevance
                .unwrap_or(self.config.min_relevance),
        };
        Ok(self.execute(&state, plan))
    }

    /// Relevance-ranked search within one scope
    pub fn quick_search(&self, text: &str, scope_id: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let query = SearchQuery::new(text)
            .with_scope(ScopeSelection::current(scope_id))
            .with_limit(limit);
        Ok(self.search(&query, &[scope_id.to_string()])?.results)
    }

    /// Search with the query expanded through the synonym table
    ///
    /// This is literal keyword expansion, not embedding similarity: a
    /// document matches only if it contains the query words or one of
    /// their listed synonyms. `scopes` are searched as the caller's
    /// accessible scopes. Expanded tokens go through the same pipeline
    /// as `search`, including the configured relevance cut.
    pub fn semantic_search(
        &self,
        text: &str,
        scopes: &[String],
        options: SemanticOptions,
    ) -> Result<Vec<SearchResult>> {
        let limit = self.check_limit(options.limit)?;
        let min_relevance = options.min_relevance.unwrap_or(self.config.min_relevance);
        let filters = SearchFilters {
            min_relevance: Some(min_relevance),
            ..Default::default()
        };
        filters.validate()?;
        let tokens = expand_tokens(text, self.synonyms.as_ref());

        let state = self.state.read();
        let selection = ScopeSelection::all_accessible();
        let plan = Plan {
            tokens,
            scopes: resolve_scopes(&selection, scopes, state.scopes().keys()),
            mode: selection.mode,
            doc_type: options.doc_type,
            filters: &filters,
            match_mode: MatchMode::Any,
            sort_by: SortBy::Relevance,
            order: SortOrder::Desc,
            offset: 0,
            limit,
            snippets: options.include_snippets,
            min_relevance,
        };
        Ok(self.execute(&state, plan).results)
    }

    /// Documents resembling `id`, from the same scope
    ///
    /// The leading tokens of the document are run as a query in its own
    /// scope, and the document itself is removed from the results. An
    /// unknown id yields an empty list.
    pub fn find_similar(&self, id: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let limit = self.check_limit(Some(limit))?;
        let state = self.state.read();
        let Some(source) = state.get(id) else {
            return Ok(vec![]);
        };
        let filters = SearchFilters::default();
        let plan = Plan {
            tokens: source
                .tokens()
                .iter()
                .take(self.config.similar_query_tokens)
                .cloned()
                .collect(),
            scopes: vec![source.document().scope_id.clone()],
            mode: ScopeMode::CurrentSphere,
            doc_type: None,
            filters: &filters,
            match_mode: MatchMode::Any,
            sort_by: SortBy::Relevance,
            order: SortOrder::Desc,
            offset: 0,
            // One extra slot for the source itself, which ranks among its own matches
            limit: limit + 1,
            snippets: false,
            min_relevance: self.config.min_relevance,
        };
        let mut results = self.execute(&state, plan).results;
        results.retain(|r| r.id != id);
        results.truncate(limit);
        Ok(results)
    }

    /// Most recently updated documents, optionally by type and scope
    ///
    /// No text and no scoring: results carry a score of 0.0.
    pub fn get_recent(
        &self,
        doc_type: TypeFilter,
        scope_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let limit = self.check_limit(Some(limit))?;
        let state = self.state.read();
        let mut listed: Vec<Scored<'_>> = list_partitioned(&state, scope_id, doc_type)
            .into_iter()
            .map(|doc| Scored { doc, score: 0.0 })
            .collect();
        results::rank(&mut listed, SortBy::Date, SortOrder::Desc);
        Ok(results::to_results(results::paginate(&listed, 0, limit), None))
    }

    /// Documents with the latest activity in a scope, across every type
    pub fn get_trending(&self, scope_id: Option<&str>, limit: usize) -> Result<Vec<SearchResult>> {
        self.get_recent(None, scope_id, limit)
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    fn check_limit(&self, limit: Option<usize>) -> Result<usize> {
        let limit = limit.unwrap_or(self.config.default_limit);
        if limit == 0 || limit > self.config.max_limit {
            return Err(Error::validation(format!(
                "limit must be between 1 and {}, got {}",
                self.config.max_limit, limit
            )));
        }
        Ok(limit)
    }

    fn execute(&self, state: &IndexState, plan: Plan<'_>) -> SearchResponse {
        let start = Instant::now();
        let ctx = ScorerContext::new(self.config.recency);

        let candidates = retrieve(
            state,
            &plan.tokens,
            plan.match_mode,
            &plan.scopes,
            plan.doc_type,
            plan.filters,
        );
        let mut scored: Vec<Scored<'_>> = candidates
            .documents
            .iter()
            .map(|&doc| Scored {
                doc,
                score: self.scorer.score(doc, &plan.tokens, &ctx),
            })
            .collect();

        if plan.sort_by == SortBy::Relevance {
            results::apply_threshold(&mut scored, plan.min_relevance);
        }
        results::rank(&mut scored, plan.sort_by, plan.order);

        let facets = results::facets(&scored);
        let total_count = scored.len();
        let page = results::paginate(&scored, plan.offset, plan.limit);
        let results = results::to_results(page, plan.snippets.then_some(self.config.snippet_length));
        let suggestions = results.is_empty().then(|| {
            results::suggestions(state, &plan.tokens, &plan.scopes, self.config.max_suggestions)
        });

        let stats = SearchStats {
            candidates_considered: candidates.considered,
            elapsed_micros: start.elapsed().as_micros() as u64,
        };
        debug!(
            target: "sphere::search",
            scorer = self.scorer.name(),
            query_tokens = plan.tokens.len(),
            scopes = plan.scopes.len(),
            candidates = stats.candidates_considered,
            total_count,
            returned = results.len(),
            elapsed_micros = stats.elapsed_micros,
            "Search complete"
        );

        SearchResponse {
            returned_count: results.len(),
            results,
            total_count,
            scope_info: ScopeInfo {
                mode: plan.mode,
                searched_scopes: plan.scopes,
            },
            facets,
            suggestions,
            stats,
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("documents", &self.len())
            .field("config", &self.config)
            .field("scorer", &self.scorer.name())
            .field("synonyms", &self.synonyms.name())
            .finish()
    }
}
