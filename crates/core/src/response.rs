//! Response types
//!
//! - SearchResult: one ranked document
//! - Facets: counts over the full filtered set, before pagination
//! - ScopeInfo: which scopes a query actually searched
//! - SearchStats: execution statistics for debugging/monitoring
//! - SearchResponse: everything `search` returns
//! - IndexStats: whole-index counters

use crate::document::{Document, DocumentType, Metadata};
use crate::query::ScopeMode;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single ranked document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document id
    pub id: String,
    /// Document type
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Title
    pub title: String,
    /// Leading slice of the content, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Relevance score (0.0 for listings that skip scoring)
    pub score: f32,
    /// Owning scope
    pub scope_id: String,
    /// Creation time
    pub created_at: Timestamp,
    /// Last modification time
    pub updated_at: Timestamp,
    /// Document metadata
    pub metadata: Metadata,
    /// Access tag from the permission layer, passed through unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,
}

impl SearchResult {
    /// Build a result from a stored document
    pub fn from_document(doc: &Document, score: f32, snippet: Option<String>) -> Self {
        SearchResult {
            id: doc.id.clone(),
            doc_type: doc.doc_type,
            title: doc.title.clone(),
            snippet,
            score,
            scope_id: doc.scope_id.clone(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            metadata: doc.metadata.clone(),
            access_level: doc.access_level().map(str::to_string),
        }
    }
}

/// Aggregate counts over the scored and filtered set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Facets {
    /// Count per document type
    pub by_type: BTreeMap<DocumentType, usize>,
    /// Count per scope id
    pub by_scope: BTreeMap<String, usize>,
    /// Count per `YYYY-MM` bucket of `created_at`
    pub by_month: BTreeMap<String, usize>,
}

impl Facets {
    /// Count one document into every dimension
    pub fn record(&mut self, doc: &Document) {
        *self.by_type.entry(doc.doc_type).or_insert(0) += 1;
        *self.by_scope.entry(doc.scope_id.clone()).or_insert(0) += 1;
        *self.by_month.entry(doc.created_at.month_bucket()).or_insert(0) += 1;
    }

    /// Whether no document was counted
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Scopes a query resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeInfo {
    /// Mode the query declared
    pub mode: ScopeMode,
    /// Concrete scope ids searched
    pub searched_scopes: Vec<String>,
}

/// Execution statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Candidate ids considered after partition intersection
    pub candidates_considered: usize,
    /// Wall time spent inside the engine (microseconds)
    pub elapsed_micros: u64,
}

/// Full response of a scoped search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The requested page of results
    pub results: Vec<SearchResult>,
    /// Size of the scored and filtered set before pagination
    pub total_count: usize,
    /// `results.len()`
    pub returned_count: usize,
    /// Scopes searched
    pub scope_info: ScopeInfo,
    /// Counts over the pre-pagination set
    pub facets: Facets,
    /// Related index tokens, only present when `results` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    /// Execution statistics
    pub stats: SearchStats,
}

impl SearchResponse {
    /// Whether no result was returned
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Ids of the returned results, in order
    pub fn ids(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.id.as_str()).collect()
    }
}

/// Whole-index counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Documents in the store
    pub total_documents: usize,
    /// Documents per type
    pub documents_by_type: BTreeMap<DocumentType, usize>,
    /// Documents per scope
    pub documents_by_scope: BTreeMap<String, usize>,
    /// Distinct tokens with a non-empty posting list
    pub unique_tokens: usize,
}
