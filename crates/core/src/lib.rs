//! Core types for Sphere
//!
//! This crate defines the plain data types shared by the engine and its callers:
//! - Document, DocumentType, MetadataValue: the unit of indexing
//! - Timestamp: microsecond time used for recency and date facets
//! - SearchQuery and friends: scope selection, filters, sorting, match mode
//! - SearchResponse and friends: results, facets, scope info, stats
//! - EngineConfig: `sphere.toml` configuration
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod query;
pub mod response;
pub mod timestamp;

pub use config::{EngineConfig, RecencyConfig, CONFIG_FILE_NAME};
pub use document::{
    metadata_from_json, Document, DocumentType, Metadata, MetadataValue, META_ACCESS_LEVEL,
    META_OWNER_ID, META_STATUS, META_TAGS,
};
pub use error::{Error, Result};
pub use query::{
    parse_type_filter, DateRange, MatchMode, ScopeMode, ScopeSelection, SearchFilters,
    SearchQuery, SortBy, SortOrder, TypeFilter,
};
pub use response::{
    Facets, IndexStats, ScopeInfo, SearchResponse, SearchResult, SearchStats,
};
pub use timestamp::Timestamp;
