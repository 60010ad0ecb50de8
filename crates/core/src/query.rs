//! Query types
//!
//! This module defines the request side of the search surface:
//! - ScopeMode / ScopeSelection: which organizational scopes to search
//! - TypeFilter: optional document type restriction ("all" = no filter)
//! - SearchFilters: metadata filters applied after token lookup
//! - SortBy / SortOrder: result ordering
//! - MatchMode: how multi-token queries combine posting lists
//! - SearchQuery: the universal request type

use crate::document::DocumentType;
use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

// ============================================================================
// Scope selection
// ============================================================================

/// How the declared scopes of a query are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeMode {
    /// Only the first declared scope
    #[default]
    CurrentSphere,
    /// Declared scopes narrowed to the accessible ones
    SpecifiedSpheres,
    /// Every scope the caller can access
    AllAccessible,
    /// Every scope present in the index (privileged; gated by the caller)
    Global,
}

/// Scope mode plus the scopes the query declares
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeSelection {
    /// Interpretation of `scopes`
    pub mode: ScopeMode,
    /// Declared scope ids (meaning depends on `mode`)
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl ScopeSelection {
    /// Search only the given scope
    pub fn current(scope_id: impl Into<String>) -> Self {
        ScopeSelection {
            mode: ScopeMode::CurrentSphere,
            scopes: vec![scope_id.into()],
        }
    }

    /// Search the given scopes, narrowed to what the caller can access
    pub fn specified<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScopeSelection {
            mode: ScopeMode::SpecifiedSpheres,
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    /// Search every accessible scope
    pub fn all_accessible() -> Self {
        ScopeSelection {
            mode: ScopeMode::AllAccessible,
            scopes: vec![],
        }
    }

    /// Search every indexed scope
    pub fn global() -> Self {
        ScopeSelection {
            mode: ScopeMode::Global,
            scopes: vec![],
        }
    }
}

// ============================================================================
// Type filter
// ============================================================================

/// Optional document type restriction
///
/// `None` is the "all" wildcard.
pub type TypeFilter = Option<DocumentType>;

/// Parse a type filter name, accepting `"all"` as the wildcard
pub fn parse_type_filter(name: &str) -> Result<TypeFilter> {
    if name.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        name.parse().map(Some)
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Inclusive creation-date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Lower bound (inclusive); unbounded when absent
    pub start: Option<Timestamp>,
    /// Upper bound (inclusive); unbounded when absent
    pub end: Option<Timestamp>,
}

impl DateRange {
    /// Window with both bounds
    pub fn between(start: Timestamp, end: Timestamp) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Whether `ts` falls inside the window
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts <= e)
    }
}

/// Metadata filters; an absent filter is not applied
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Creation date window
    #[serde(default)]
    pub date_range: Option<DateRange>,
    /// Exact owner id
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Exact status
    #[serde(default)]
    pub status: Option<String>,
    /// Match if the document carries at least one of these tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Overrides the configured minimum relevance (relevance sort only)
    #[serde(default)]
    pub min_relevance: Option<f32>,
}

impl SearchFilters {
    /// Reject malformed filters
    ///
    /// Nothing is corrected silently: an inverted date range is an error,
    /// not a swapped range.
    pub fn validate(&self) -> Result<()> {
        if let Some(DateRange {
            start: Some(start),
            end: Some(end),
        }) = self.date_range
        {
            if start > end {
                return Err(Error::validation(format!(
                    "date range start ({}) is after end ({})",
                    start, end
                )));
            }
        }
        if let Some(min) = self.min_relevance {
            if !min.is_finite() || min < 0.0 {
                return Err(Error::validation(format!(
                    "min_relevance must be a non-negative finite number, got {}",
                    min
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Sorting and matching
// ============================================================================

/// Result ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Relevance score
    #[default]
    Relevance,
    /// `updated_at`
    Date,
    /// Title, byte-wise lexicographic
    Title,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

/// How posting lists of multiple query tokens are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Union: a document matching any token is a candidate
    #[default]
    Any,
    /// Intersection: a document must contain every token
    All,
}

// ============================================================================
// SearchQuery
// ============================================================================

/// Request for a scoped search
///
/// # Examples
///
/// ```
/// use sphere_core::{ScopeSelection, SearchQuery, SortBy};
///
/// let query = SearchQuery::new("renovation budget")
///     .with_scope(ScopeSelection::current("mtl"))
///     .with_sort(SortBy::Relevance)
///     .with_limit(5);
///
/// assert_eq!(query.text, "renovation budget");
/// assert_eq!(query.limit, Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text, tokenized exactly like document text
    pub text: String,
    /// Scopes to search
    #[serde(default)]
    pub scope: ScopeSelection,
    /// Type restriction (`None` = all types)
    #[serde(default)]
    pub doc_type: TypeFilter,
    /// Metadata filters
    #[serde(default)]
    pub filters: SearchFilters,
    /// Ordering key
    #[serde(default)]
    pub sort_by: SortBy,
    /// Ordering direction
    #[serde(default)]
    pub order: SortOrder,
    /// Results to skip (default 0)
    #[serde(default)]
    pub offset: usize,
    /// Page size (engine default when absent)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Attach content snippets to results
    #[serde(default)]
    pub include_snippets: bool,
    /// Posting list combination (engine default when absent)
    #[serde(default)]
    pub match_mode: Option<MatchMode>,
}

impl SearchQuery {
    /// Create a query with defaults (current sphere, all types, relevance desc)
    pub fn new(text: impl Into<String>) -> Self {
        SearchQuery {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Builder: set scope selection
    pub fn with_scope(mut self, scope: ScopeSelection) -> Self {
        self.scope = scope;
        self
    }

    /// Builder: restrict to one document type
    pub fn with_type(mut self, doc_type: DocumentType) -> Self {
        self.doc_type = Some(doc_type);
        self
    }

    /// Builder: set filters
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Builder: set sort key
    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Builder: set sort direction
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Builder: set offset
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Builder: set page size
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builder: request snippets
    pub fn with_snippets(mut self) -> Self {
        self.include_snippets = true;
        self
    }

    /// Builder: set match mode
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = Some(mode);
        self
    }
}
